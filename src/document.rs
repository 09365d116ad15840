/// A region of the rendered page whose contents are replaced wholesale on
/// each render. Appending is only used when a newly created post joins the
/// already-rendered list.
pub struct Surface {
    html: String,
}

impl Surface {
    fn new() -> Surface {
        Surface { html: String::new() }
    }

    pub fn replace(&mut self, html: String) {
        self.html = html;
    }

    pub fn append(&mut self, html: &str) {
        self.html.push_str(html);
    }

    pub fn contents(&self) -> &str {
        &self.html
    }
}

/// In-memory page state. The surfaces are the only state shared between the
/// request handlers and spawned fetch tasks; every view of the posts is
/// re-derived from the latest server response, never cached.
pub struct Document {
    pub post_list: Surface,
    pub post_detail: Surface,
    pub error_banner: Surface,
}

impl Document {
    pub fn new() -> Document {
        Document {
            post_list: Surface::new(),
            post_detail: Surface::new(),
            error_banner: Surface::new(),
        }
    }
}

/// Current values of the new-post form. Reset to empty after a successful
/// submission; kept as submitted when the creation fails so the user can
/// resubmit.
pub struct FormState {
    pub title: String,
    pub content: String,
    pub author: String,
}

impl FormState {
    pub fn new() -> FormState {
        FormState {
            title: String::new(),
            content: String::new(),
            author: String::new(),
        }
    }

    pub fn reset(&mut self) {
        self.title.clear();
        self.content.clear();
        self.author.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.content.is_empty() && self.author.is_empty()
    }
}
