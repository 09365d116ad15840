use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::document::{Document, FormState};

#[derive(ramhorns::Content)]
struct IndexPage<'a> {
    post_list: &'a str,
    post_detail: &'a str,
    error_banner: &'a str,
    form_title: &'a str,
    form_content: &'a str,
    form_author: &'a str,
    has_alert: bool,
    alert_message: &'a str,
}

/// Renders the whole page around the current surfaces. The surface fragments
/// are already rendered HTML and go in unescaped; the form values and the
/// alert text are user input and stay escaped.
pub struct PageRenderer<'a> {
    pub template: Template<'a>,
}

impl PageRenderer<'_> {
    pub fn new(index_tpl_src: &str) -> io::Result<PageRenderer> {
        let template = match Template::new(index_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing index template: {}", e)));
            }
        };

        Ok(PageRenderer {
            template,
        })
    }

    pub fn render(&self, document: &Document, form: &FormState, alert: Option<&str>) -> String {
        self.template.render(&IndexPage {
            post_list: document.post_list.contents(),
            post_detail: document.post_detail.contents(),
            error_banner: document.error_banner.contents(),
            form_title: form.title.as_str(),
            form_content: form.content.as_str(),
            form_author: form.author.as_str(),
            has_alert: alert.is_some(),
            alert_message: alert.unwrap_or(""),
        })
    }
}
