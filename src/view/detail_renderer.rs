use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::post::PostDetail;

#[derive(ramhorns::Content)]
struct DetailView<'a> {
    title: &'a str,
    author: &'a str,
    content: &'a str,
}

pub struct DetailRenderer<'a> {
    pub template: Template<'a>,
}

impl DetailRenderer<'_> {
    pub fn new(view_tpl_src: &str) -> io::Result<DetailRenderer> {
        let template = match Template::new(view_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing post view template: {}", e)));
            }
        };

        Ok(DetailRenderer {
            template,
        })
    }

    pub fn render(&self, post: &PostDetail) -> String {
        self.template.render(&DetailView {
            title: post.title.as_str(),
            author: post.author.as_str(),
            content: post.content.as_str(),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::post::PostDetail;
    use crate::view::detail_renderer::DetailRenderer;

    #[test]
    fn render_view() {
        let template_src = r##"TITLE=[{{title}}]
AUTHOR=[{{author}}]
CONTENT=[{{content}}]"##;
        let detail_renderer = DetailRenderer::new(template_src).unwrap();
        let post = PostDetail {
            id: 4,
            title: "<post-title>".to_string(),
            author: "<Mika>".to_string(),
            content: "Plain text content".to_string(),
        };
        let res = detail_renderer.render(&post);
        assert_eq!(res, r##"TITLE=[&lt;post-title&gt;]
AUTHOR=[&lt;Mika&gt;]
CONTENT=[Plain text content]"##);
    }
}
