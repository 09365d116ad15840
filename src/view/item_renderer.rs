use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::post::PostSummary;

#[derive(ramhorns::Content)]
struct PostItem<'a> {
    id: u64,
    title: &'a str,
    image: &'a str,
    has_image: bool,
}

/// Renders one feed entry: title, the image when the post has one, and the
/// view control scoped to that post's id. The template escapes all text
/// fields.
pub struct ItemRenderer<'a> {
    pub template: Template<'a>,
}

impl ItemRenderer<'_> {
    pub fn new(item_tpl_src: &str) -> io::Result<ItemRenderer> {
        let template = match Template::new(item_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing post item template: {}", e)));
            }
        };

        Ok(ItemRenderer {
            template,
        })
    }

    pub fn render(&self, post: &PostSummary) -> String {
        self.template.render(&PostItem {
            id: post.id,
            title: post.title.as_str(),
            image: post.image.as_deref().unwrap_or(""),
            has_image: post.image.is_some(),
        })
    }

    pub fn render_list(&self, posts: &[PostSummary]) -> String {
        let mut rendered = String::new();
        for post in posts {
            rendered.push_str(&self.render(post));
        }

        rendered
    }
}
