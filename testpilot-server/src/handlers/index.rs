use askama::Template;
use axum::response::Html;

use crate::error::Result;

#[derive(Template)]
#[template(path = "index.html")]
struct PromptFormTemplate;

pub async fn index() -> Result<Html<String>> {
    let template = PromptFormTemplate;

    Ok(Html(template.render()?))
}
