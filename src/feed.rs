use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use std::{fs, io};

use anyhow::Result;
use ramhorns::Template;
use spdlog::{debug, error, info};

use crate::api::ApiClient;
use crate::document::Document;
use crate::post::{NewPostDraft, PostDetail, PostSummary};
use crate::view::detail_renderer::DetailRenderer;
use crate::view::item_renderer::ItemRenderer;

pub const LOADING: &str = "<p>Loading...</p>";
pub const LOAD_POSTS_FAILED: &str = "<p>Failed to load posts. Please try again later.</p>";
pub const LOAD_DETAIL_FAILED: &str = "<p>Failed to load post details.</p>";
pub const CREATE_POST_FAILED: &str = "Failed to create post. Please try again.";

const ERROR_BANNER_TPL: &str = r#"<div class="error">{{message}}</div>"#;
const ERROR_BANNER_SECS: u64 = 5;

#[derive(ramhorns::Content)]
struct ErrorBanner<'a> {
    message: &'a str,
}

fn render_item(template_dir: &Path, post: &PostSummary) -> io::Result<String> {
    let template_src = fs::read_to_string(template_dir.join("post_item.tpl"))?;
    let renderer = ItemRenderer::new(&template_src)?;
    Ok(renderer.render(post))
}

fn render_items(template_dir: &Path, posts: &[PostSummary]) -> io::Result<String> {
    let template_src = fs::read_to_string(template_dir.join("post_item.tpl"))?;
    let renderer = ItemRenderer::new(&template_src)?;
    Ok(renderer.render_list(posts))
}

fn render_detail(template_dir: &Path, post: &PostDetail) -> io::Result<String> {
    let template_src = fs::read_to_string(template_dir.join("post_view.tpl"))?;
    let renderer = DetailRenderer::new(&template_src)?;
    Ok(renderer.render(post))
}

/// Fetches the post collection and replaces the list surface wholesale,
/// either with one rendered item per post in server order or with the fixed
/// failure message. Nothing is retried.
pub async fn load_feed(api: &ApiClient, template_dir: &Path, document: &Arc<Mutex<Document>>) {
    let rendered = match api.fetch_posts().await {
        Ok(posts) => {
            info!("Fetched {} posts", posts.len());
            match render_items(template_dir, &posts) {
                Ok(html) => html,
                Err(e) => {
                    error!("Error rendering post list: {}", e);
                    LOAD_POSTS_FAILED.to_string()
                }
            }
        }
        Err(e) => {
            error!("Error fetching posts: {}", e);
            LOAD_POSTS_FAILED.to_string()
        }
    };

    document.lock().unwrap().post_list.replace(rendered);
}

/// Puts the loading placeholder on the detail surface right away, then
/// resolves the fetch in a spawned task. Requests are neither sequenced nor
/// aborted: when two loads overlap, the last response to resolve wins.
pub fn load_detail(api: ApiClient, template_dir: PathBuf, document: Arc<Mutex<Document>>, post_id: u64) {
    document.lock().unwrap().post_detail.replace(LOADING.to_string());

    ntex::rt::spawn(async move {
        let rendered = fetch_detail(&api, &template_dir, post_id).await;
        document.lock().unwrap().post_detail.replace(rendered);
    });
}

/// Terminal state of one detail load: the rendered pane or the fixed
/// failure message.
pub async fn fetch_detail(api: &ApiClient, template_dir: &Path, post_id: u64) -> String {
    match api.fetch_post(post_id).await {
        Ok(post) => {
            debug!("Showing post details: {}", post);
            match render_detail(template_dir, &post) {
                Ok(html) => html,
                Err(e) => {
                    error!("Error rendering post {} details: {}", post_id, e);
                    LOAD_DETAIL_FAILED.to_string()
                }
            }
        }
        Err(e) => {
            error!("Error fetching post {} details: {}", post_id, e);
            LOAD_DETAIL_FAILED.to_string()
        }
    }
}

/// Sends the draft and, on success, appends the echoed post to the end of
/// the rendered list without re-fetching the collection. The list and the
/// server may diverge until the next full feed load. On failure the list is
/// untouched and the error goes back to the caller.
pub async fn submit_post(api: &ApiClient, template_dir: &Path, document: &Arc<Mutex<Document>>, draft: &NewPostDraft) -> Result<()> {
    let created = api.create_post(draft).await?;
    info!("Created new post {} ({})", created.id, created.title);

    let rendered = render_item(template_dir, &created)?;
    document.lock().unwrap().post_list.append(&rendered);
    Ok(())
}

/// Extension point: transient error banner, cleared again after a fixed
/// delay. Not wired into any operation yet.
pub fn show_error(document: &Arc<Mutex<Document>>, message: &str) {
    let template = match Template::new(ERROR_BANNER_TPL) {
        Ok(x) => x,
        Err(e) => {
            error!("Error parsing error banner template: {}", e);
            return;
        }
    };

    let rendered = template.render(&ErrorBanner { message });
    document.lock().unwrap().error_banner.replace(rendered);
    dismiss_later(document.clone(), Duration::from_secs(ERROR_BANNER_SECS));
}

fn dismiss_later(document: Arc<Mutex<Document>>, delay: Duration) {
    ntex::rt::spawn(async move {
        tokio::time::sleep(delay).await;
        document.lock().unwrap().error_banner.replace(String::new());
    });
}

/// Extension point for edit support. No request is issued yet.
pub async fn update_post(api: &ApiClient, post_id: u64, draft: &NewPostDraft) -> Result<()> {
    info!("Would update post {} at {} with title ({})", post_id, api.base_url(), draft.title);
    Ok(())
}

#[cfg(test)]
mod tests {
    use httpmock::MockServer;

    use crate::test_data::{POSTS_JSON, POST_DETAIL_JSON};

    use super::*;

    fn template_dir() -> PathBuf {
        PathBuf::from("templates")
    }

    fn new_document() -> Arc<Mutex<Document>> {
        Arc::new(Mutex::new(Document::new()))
    }

    #[ntex::test]
    async fn test_load_feed_renders_all_posts() {
        let server = MockServer::start_async().await;
        let mock = server.mock_async(|when, then| {
            when.method("GET").path("/posts");
            then.status(200)
                .header("content-type", "application/json")
                .body(POSTS_JSON);
        }).await;

        let api = ApiClient::new(&server.base_url()).unwrap();
        let document = new_document();
        load_feed(&api, &template_dir(), &document).await;
        mock.assert_async().await;

        let document = document.lock().unwrap();
        let list = document.post_list.contents();
        assert_eq!(list.matches("post-item").count(), 3);

        // Server-supplied order is preserved
        let pos_1 = list.find(r#"data-id="1""#).unwrap();
        let pos_2 = list.find(r#"data-id="2""#).unwrap();
        let pos_3 = list.find(r#"data-id="3""#).unwrap();
        assert!(pos_1 < pos_2 && pos_2 < pos_3);

        // Only the second post carries an image
        assert_eq!(list.matches("<img").count(), 1);
        assert!(list.contains(r#"src="http://localhost:3000/images/pond.jpg""#));
    }

    #[ntex::test]
    async fn test_load_feed_failure_replaces_whole_list() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method("GET").path("/posts");
            then.status(500);
        }).await;

        let api = ApiClient::new(&server.base_url()).unwrap();
        let document = new_document();
        document.lock().unwrap().post_list.replace("<p>stale items</p>".to_string());

        load_feed(&api, &template_dir(), &document).await;
        assert_eq!(document.lock().unwrap().post_list.contents(), LOAD_POSTS_FAILED);
    }

    #[ntex::test]
    async fn test_load_detail_sets_placeholder_first() {
        // Unroutable endpoint: the spawned task has not resolved when the
        // placeholder is checked
        let api = ApiClient::new("http://127.0.0.1:1").unwrap();
        let document = new_document();

        load_detail(api, template_dir(), document.clone(), 7);
        assert_eq!(document.lock().unwrap().post_detail.contents(), LOADING);
    }

    #[ntex::test]
    async fn test_fetch_detail_renders_pane() {
        let server = MockServer::start_async().await;
        let mock = server.mock_async(|when, then| {
            when.method("GET").path("/posts/2");
            then.status(200)
                .header("content-type", "application/json")
                .body(POST_DETAIL_JSON);
        }).await;

        let api = ApiClient::new(&server.base_url()).unwrap();
        let rendered = fetch_detail(&api, &template_dir(), 2).await;
        mock.assert_async().await;

        assert!(rendered.contains("A pond in spring"));
        assert!(rendered.contains("By: mika"));
        assert!(rendered.contains("herons"));
    }

    #[ntex::test]
    async fn test_fetch_detail_failure() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method("GET").path("/posts/99");
            then.status(404);
        }).await;

        let api = ApiClient::new(&server.base_url()).unwrap();
        let rendered = fetch_detail(&api, &template_dir(), 99).await;
        assert_eq!(rendered, LOAD_DETAIL_FAILED);
    }

    #[ntex::test]
    async fn test_submit_post_appends_echoed_post() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method("POST").path("/posts");
            then.status(201)
                .header("content-type", "application/json")
                .body(r#"{"id":7,"title":"T"}"#);
        }).await;

        let api = ApiClient::new(&server.base_url()).unwrap();
        let document = new_document();
        document.lock().unwrap().post_list.replace("<p>existing</p>".to_string());

        let draft = NewPostDraft {
            title: "T".to_string(),
            content: "C".to_string(),
            author: "A".to_string(),
        };
        submit_post(&api, &template_dir(), &document, &draft).await.unwrap();

        let document = document.lock().unwrap();
        let list = document.post_list.contents();
        let pos_existing = list.find("<p>existing</p>").unwrap();
        let pos_new = list.find(r#"data-id="7""#).unwrap();
        assert!(pos_existing < pos_new);
        assert!(list.contains("<h3>T</h3>"));
    }

    #[ntex::test]
    async fn test_submit_post_failure_leaves_list_untouched() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method("POST").path("/posts");
            then.status(500);
        }).await;

        let api = ApiClient::new(&server.base_url()).unwrap();
        let document = new_document();
        document.lock().unwrap().post_list.replace("<p>existing</p>".to_string());

        let draft = NewPostDraft {
            title: "T".to_string(),
            content: "C".to_string(),
            author: "A".to_string(),
        };
        let res = submit_post(&api, &template_dir(), &document, &draft).await;
        assert!(res.is_err());
        assert_eq!(document.lock().unwrap().post_list.contents(), "<p>existing</p>");
    }

    #[ntex::test]
    async fn test_show_error_fills_banner() {
        let document = new_document();
        show_error(&document, "Something & something else failed");
        let contents = document.lock().unwrap().error_banner.contents().to_string();
        assert!(contents.starts_with(r#"<div class="error">"#));
        assert!(contents.contains("Something &amp; something else failed"));
    }

    #[ntex::test]
    async fn test_banner_dismissed_after_delay() {
        let document = new_document();
        document.lock().unwrap().error_banner.replace("<div class=\"error\">x</div>".to_string());

        dismiss_later(document.clone(), Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(document.lock().unwrap().error_banner.contents(), "");
    }
}
