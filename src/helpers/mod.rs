use axum::response::Html;
use tera::{Context, Tera};

use crate::error::AppError;
use crate::models::user::User;

pub trait RenderHtml {
    fn render_html(&self, template: &str, ctx: &Context) -> Result<Html<String>, AppError>;
}

impl RenderHtml for Tera {
    fn render_html(&self, template: &str, ctx: &Context) -> Result<Html<String>, AppError> {
        Ok(Html(self.render(template, ctx)?))
    }
}

/// Base context every page gets: the logged-in username for the nav bar.
pub fn page_context(user: Option<&User>) -> Context {
    let mut ctx = Context::new();
    ctx.insert("current_user", &user.map(|u| u.username.as_str()));
    ctx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nav_shows_the_logged_in_user() {
        let mut tera = Tera::default();
        tera.add_raw_template(
            "nav.html",
            "{% if current_user %}hi {{ current_user }}{% else %}anon{% endif %}",
        )
        .unwrap();

        let user = User {
            id: 1,
            username: "alice".into(),
            password: "pw1".into(),
        };
        let Html(with_user) = tera
            .render_html("nav.html", &page_context(Some(&user)))
            .unwrap();
        let Html(anonymous) = tera.render_html("nav.html", &page_context(None)).unwrap();

        assert_eq!(with_user, "hi alice");
        assert_eq!(anonymous, "anon");
    }

    #[test]
    fn missing_template_is_an_error() {
        let tera = Tera::default();
        assert!(tera.render_html("nope.html", &page_context(None)).is_err());
    }
}
