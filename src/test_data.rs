#[cfg(test)]
pub const POSTS_JSON: &str = r#"[
  {
    "id": 1,
    "title": "First post"
  },
  {
    "id": 2,
    "title": "A pond in spring",
    "image": "http://localhost:3000/images/pond.jpg"
  },
  {
    "id": 3,
    "title": "Notes on sourdough"
  }
]"#;

#[cfg(test)]
pub const POST_DETAIL_JSON: &str = r#"{
  "id": 2,
  "title": "A pond in spring",
  "author": "mika",
  "content": "The ice broke up last week and the herons are back."
}"#;
