use std::io::ErrorKind;
use std::sync::{Arc, Mutex};
use std::{fs, io};

use ntex::web;
use ntex_files::NamedFile;
use serde::Deserialize;
use spdlog::{error, info};

use crate::api::ApiClient;
use crate::config::Config;
use crate::document::{Document, FormState};
use crate::feed::{load_detail, load_feed, submit_post, CREATE_POST_FAILED};
use crate::post::NewPostDraft;
use crate::view::page_renderer::PageRenderer;

struct AppState {
    document: Arc<Mutex<Document>>,
    form: FormState,
    alert: Option<String>,
    api: ApiClient,
    config: Config,
}

#[derive(Deserialize)]
struct NewPostForm {
    title: String,
    content: String,
    author: String,
}

fn redirect_to_index() -> web::HttpResponse {
    web::HttpResponse::SeeOther()
        .header("Location", "/")
        .finish()
}

#[web::get("/")]
async fn index(state: web::types::State<Arc<Mutex<AppState>>>) -> web::HttpResponse {
    let mut state = state.lock().unwrap();
    // The alert is one-shot: raised by a failed submission, consumed by the
    // next page render
    let alert = state.alert.take();

    let template_path = state.config.paths.template_dir.join("index.tpl");
    let template_src = match fs::read_to_string(&template_path) {
        Ok(src) => src,
        Err(e) => {
            return web::HttpResponse::InternalServerError()
                .body(format!("Error loading index template: {}", e));
        }
    };

    let renderer = match PageRenderer::new(&template_src) {
        Ok(renderer) => renderer,
        Err(e) => {
            return web::HttpResponse::InternalServerError()
                .body(format!("Error parsing index template: {}", e));
        }
    };

    let rendered = {
        let document = state.document.lock().unwrap();
        renderer.render(&document, &state.form, alert.as_deref())
    };

    web::HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(rendered)
}

#[web::get("/list")]
async fn list(state: web::types::State<Arc<Mutex<AppState>>>) -> web::HttpResponse {
    // Clone the handles so the state lock is not held across the fetch
    let (api, template_dir, document) = {
        let state = state.lock().unwrap();
        (state.api.clone(), state.config.paths.template_dir.clone(), state.document.clone())
    };

    load_feed(&api, &template_dir, &document).await;
    redirect_to_index()
}

#[web::get("/view/{id}")]
async fn view(path: web::types::Path<u64>, state: web::types::State<Arc<Mutex<AppState>>>) -> web::HttpResponse {
    let post_id = path.into_inner();
    let (api, template_dir, document) = {
        let state = state.lock().unwrap();
        (state.api.clone(), state.config.paths.template_dir.clone(), state.document.clone())
    };

    load_detail(api, template_dir, document, post_id);
    redirect_to_index()
}

#[web::post("/new")]
async fn create(form: web::types::Form<NewPostForm>, state: web::types::State<Arc<Mutex<AppState>>>) -> web::HttpResponse {
    let form = form.into_inner();
    let draft = NewPostDraft {
        title: form.title,
        content: form.content,
        author: form.author,
    };

    let (api, template_dir, document) = {
        let state = state.lock().unwrap();
        (state.api.clone(), state.config.paths.template_dir.clone(), state.document.clone())
    };

    let res = submit_post(&api, &template_dir, &document, &draft).await;

    let mut state = state.lock().unwrap();
    match res {
        Ok(()) => state.form.reset(),
        Err(e) => {
            error!("Error creating post: {}", e);
            state.form = FormState {
                title: draft.title,
                content: draft.content,
                author: draft.author,
            };
            state.alert = Some(CREATE_POST_FAILED.to_string());
        }
    }

    redirect_to_index()
}

#[web::get("/public/{file_name}")]
async fn public_files(path: web::types::Path<String>, state: web::types::State<Arc<Mutex<AppState>>>) -> Result<NamedFile, web::Error> {
    if path.contains("../") {
        return Err(web::error::ErrorUnauthorized("Access forbidden").into());
    }

    let state = state.lock().unwrap();
    let file_path = state.config.paths.public_dir.join(path.into_inner());

    Ok(NamedFile::open(file_path)?)
}

pub async fn server_run(config: Config) -> io::Result<()> {
    let api = match ApiClient::new(&config.api.base_url) {
        Ok(api) => api,
        Err(e) => return Err(io::Error::new(ErrorKind::InvalidInput, e.to_string())),
    };

    let document = Arc::new(Mutex::new(Document::new()));

    // First feed render happens before the server accepts requests, so the
    // first page view shows either the feed or its failure message
    load_feed(&api, &config.paths.template_dir, &document).await;

    let bind_addr = config.server.address.clone();
    let bind_port = config.server.port;
    let app_state = Arc::new(Mutex::new(AppState {
        document,
        form: FormState::new(),
        alert: None,
        api,
        config,
    }));

    info!("App initialized");

    web::HttpServer::new(move || {
        web::App::new()
            .state(app_state.clone())
            .service(index)
            .service(list)
            .service(view)
            .service(create)
            .service(public_files)
    })
        .bind((bind_addr, bind_port))?
        .run()
        .await
}
