//! Server-rendered HTML for sections and the sign-in page

use crate::settings::AuthProvider;
use minivault_core::{ProjectConfig, Section, User};
use serde_json::Value;
use std::fmt::Write;
use std::sync::Arc;

/// Data a section read through the fetch cache, per resource
pub(crate) type SectionData = Vec<(&'static str, Result<Arc<Value>, String>)>;

/// Minimal HTML escaping for text and attribute values
pub(crate) fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn layout(project: &ProjectConfig, title: &str, active: Option<Section>, body: &str) -> String {
    let mut nav = String::new();
    for section in Section::ALL {
        let class = if Some(section) == active { " class=\"active\"" } else { "" };
        let _ = write!(
            nav,
            "<a href=\"{}\"{}>{}</a>",
            section.route(),
            class,
            section.title()
        );
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{title} · {project}</title></head>\n<body>\n<nav>{nav}</nav>\n<main>\n{body}\n</main>\n</body>\n</html>\n",
        title = escape(title),
        project = escape(&project.name),
    )
}

/// Neutral page shown while the session is still resolving
pub(crate) fn placeholder(project: &ProjectConfig, section: Section) -> String {
    layout(
        project,
        section.title(),
        Some(section),
        "<div class=\"loading\" aria-busy=\"true\">Loading…</div>",
    )
}

/// Page for a signed-in viewer
pub(crate) fn section_page(
    project: &ProjectConfig,
    section: Section,
    user: &User,
    data: &SectionData,
) -> String {
    let mut body = format!(
        "<header><h1>{}</h1><p class=\"viewer\">Signed in as {}</p></header>\n",
        escape(section.title()),
        escape(&user.name)
    );

    match section {
        Section::Overview => body.push_str(&overview(project)),
        Section::Reports => body.push_str(&reports(project)),
        _ => {}
    }

    if let Some(category) = section.notion_category() {
        match project.notion_databases.get(category) {
            Some(id) => {
                let _ = writeln!(
                    body,
                    "<p class=\"source\">Notion database <code>{}</code> ({})</p>",
                    escape(id),
                    category.key()
                );
            }
            None => {
                let _ = writeln!(
                    body,
                    "<p class=\"source missing\">No Notion database configured for {}</p>",
                    category.key()
                );
            }
        }
    }

    for (resource, result) in data {
        match result {
            Ok(value) => {
                let pretty = serde_json::to_string_pretty(value.as_ref()).unwrap_or_default();
                let _ = writeln!(
                    body,
                    "<section data-resource=\"{}\"><pre>{}</pre></section>",
                    escape(resource),
                    escape(&pretty)
                );
            }
            Err(message) => {
                let _ = writeln!(
                    body,
                    "<section data-resource=\"{}\" class=\"error\">{}</section>",
                    escape(resource),
                    escape(message)
                );
            }
        }
    }

    layout(project, section.title(), Some(section), &body)
}

fn overview(project: &ProjectConfig) -> String {
    let mut out = format!("<h2>{}</h2>\n", escape(&project.name));
    if let Some(description) = &project.description {
        let _ = writeln!(out, "<p>{}</p>", escape(description));
    }
    if let Some(github) = &project.github {
        let url = github.url();
        let _ = writeln!(
            out,
            "<p>Repository: <a href=\"{}\">{}/{}</a></p>",
            escape(&url),
            escape(&github.owner),
            escape(&github.repo)
        );
    }
    if let Some(drive) = &project.google_drive {
        let _ = writeln!(
            out,
            "<p>Drive folder: <a href=\"https://drive.google.com/drive/folders/{id}\">{id}</a></p>",
            id = escape(&drive.folder_id)
        );
    }
    if !project.custom_links.is_empty() {
        out.push_str("<ul class=\"links\">\n");
        for link in &project.custom_links {
            let _ = writeln!(
                out,
                "<li><a href=\"{}\">{}</a></li>",
                escape(&link.url),
                escape(&link.name)
            );
        }
        out.push_str("</ul>\n");
    }
    out
}

fn reports(project: &ProjectConfig) -> String {
    let reports = project.reports_newest_first();
    if reports.is_empty() {
        return "<p>No weekly reports yet.</p>\n".to_string();
    }
    let mut out = String::new();
    for report in reports {
        let _ = writeln!(
            out,
            "<article id=\"report-{}\"><h2>{}</h2><time>{}</time><p>{}</p></article>",
            escape(&report.id),
            escape(&report.title),
            report.date.format("%Y-%m-%d"),
            escape(&report.content)
        );
    }
    out
}

/// Sign-in landing page
pub(crate) fn sign_in_page(project: &ProjectConfig, providers: &[AuthProvider], auth_url: &str) -> String {
    let mut body = format!("<h1>Sign in to {}</h1>\n", escape(&project.name));
    if providers.is_empty() {
        body.push_str("<p>No sign-in providers are configured.</p>\n");
    } else {
        body.push_str("<ul class=\"providers\">\n");
        for provider in providers {
            let _ = writeln!(
                body,
                "<li><a href=\"{}/api/auth/signin/{}\">Sign in with {}</a></li>",
                escape(auth_url),
                provider.id(),
                provider.label()
            );
        }
        body.push_str("</ul>\n");
    }
    layout(project, "Sign in", None, &body)
}
