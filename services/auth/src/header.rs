//! Header presence indicator

use askama::Template;

use crate::error::AuthResult;
use crate::models::CurrentUserView;

/// What the header's account region shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderView {
    SignedIn { name: String },
    SignedOut,
}

/// Markup for the header's account region
#[derive(Template)]
#[template(path = "header.html")]
struct HeaderTemplate<'a> {
    user_name: Option<&'a str>,
}

impl HeaderView {
    pub fn for_user(user: Option<&CurrentUserView>) -> Self {
        match user {
            Some(user) => HeaderView::SignedIn {
                name: user.name.clone(),
            },
            None => HeaderView::SignedOut,
        }
    }

    /// Markup that replaces the contents of the header's account region
    ///
    /// The user name is HTML-escaped.
    pub fn render(&self) -> AuthResult<String> {
        let template = HeaderTemplate {
            user_name: match self {
                HeaderView::SignedIn { name } => Some(name.as_str()),
                HeaderView::SignedOut => None,
            },
        };

        Ok(template.render()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_out_links() {
        let html = HeaderView::for_user(None).render().unwrap();
        assert!(html.contains(r#"href="signin.html""#));
        assert!(html.contains(r#"href="signup.html""#));
        assert!(!html.contains("logout-btn"));
    }

    #[test]
    fn test_signed_in_menu_escapes_name() {
        let user = CurrentUserView {
            id: 1,
            name: "<b>Jane & Co</b>".to_string(),
            email: "jane@example.com".to_string(),
        };

        let html = HeaderView::for_user(Some(&user)).render().unwrap();
        assert!(html.contains("&lt;b&gt;Jane &amp; Co&lt;/b&gt;"));
        assert!(html.contains(r#"onclick="logout()""#));
        assert!(!html.contains("<b>"));
        assert!(!html.contains("SIGN IN"));
    }
}
