//! Selection chain plus a request scheduled on a local executor.
//!
//! Run with `RUST_LOG=domq=debug cargo run --example basic`.

use anyhow::Result;
use domq::{Page, Request, Transport, TransportResponse, NetError, select, spawn_ajax};
use tracing_subscriber::EnvFilter;

const HTML: &str = r#"
<ul id="todo">
  <li class="item done">write parser</li>
  <li class="item">write selectors</li>
  <li class="item">ship it</li>
</ul>
<div id="status"></div>
"#;

/// Answers every request locally so the demo runs offline
struct Offline;

impl Transport for Offline {
    async fn send(&self, request: &Request) -> Result<TransportResponse, NetError> {
        Ok(TransportResponse::ok(format!("<li class=\"item\">from {}</li>", request.url)))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let page = Page::from_html(HTML)?;

    select(&page, "li.done").rm_class(&["done"]).css("textDecoration", "line-through");
    select(&page, "li").includes("ship").set_attr("data-priority", "high").after("<li>celebrate</li>");
    select(&page, "#status").set_text("3 open");

    let executor = smol::LocalExecutor::new();
    let target = page.clone();
    let task = spawn_ajax(
        &executor,
        Offline,
        Request::get("/todo/next"),
        move |markup| {
            target.select("#todo").append(&markup);
        },
        || tracing::warn!("no response body"),
    );
    smol::block_on(executor.run(task))?;

    println!("{}", select(&page, "#todo").html());
    println!("status: {}", select(&page, "#status").text());
    Ok(())
}
