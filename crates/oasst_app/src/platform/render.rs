//! Plain-text rendering of view models for the terminal.

use std::fmt::Write;

use oasst_core::{
    ChatConfigView, DocsIndex, DraftViewer, MessageView, RankingPhase, RankingView, RenderedBody,
};

pub fn ranking(view: &RankingView) -> String {
    let mut out = String::new();
    match view.phase {
        RankingPhase::Idle | RankingPhase::Loading => out.push_str("Loading task...\n"),
        RankingPhase::Empty => out.push_str("No tasks found.\n"),
        RankingPhase::Ready | RankingPhase::Submitting => {
            if let Some(id) = &view.task_id {
                let _ = writeln!(out, "Task {id}");
            }
            out.push_str("Conversation:\n");
            for message in &view.messages {
                let who = if message.is_assistant { "assistant" } else { "user" };
                let _ = writeln!(out, "  [{who}] {}", message.text);
            }
            out.push_str("Replies, best first:\n");
            for (position, reply) in view.replies.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "  {}. (#{}) {}",
                    position + 1,
                    reply.original_index + 1,
                    reply.text
                );
            }
        }
    }
    if let Some(error) = &view.error {
        let _ = writeln!(out, "error: {error}");
    }
    out
}

pub fn chat_config(view: &ChatConfigView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "model:  {}", view.model_config_name);
    let preset = view
        .preset_options
        .iter()
        .find(|option| option.value == view.selected_preset_name)
        .map(|option| option.label.as_str())
        .unwrap_or(view.selected_preset_name.as_str());
    let lock = if view.preset_locked { " (locked by plugins)" } else { "" };
    let _ = writeln!(out, "preset: {preset}{lock}");

    let options: Vec<&str> = view.preset_options.iter().map(|o| o.label.as_str()).collect();
    let _ = writeln!(out, "presets available: {}", options.join(", "));

    out.push_str("sampling:\n");
    for field in &view.parameters {
        let value = field
            .value
            .map(|v| format!("{v:.prec$}", prec = field.range.precision as usize))
            .unwrap_or_else(|| "off".to_string());
        let _ = writeln!(
            out,
            "  {:<20} {:>8}  [{} - {}]{}",
            field.label,
            value,
            field.range.min,
            field.range.max,
            if field.disabled { "" } else { " editable" }
        );
    }

    if !view.plugins.is_empty() {
        out.push_str("plugins:\n");
        for plugin in &view.plugins {
            let mark = if plugin.enabled { "x" } else { " " };
            let _ = writeln!(out, "  [{mark}] {}", plugin.url);
        }
    }
    if let Some(error) = &view.error {
        let _ = writeln!(out, "error: {error}");
    }
    out
}

pub fn message(view: &MessageView) -> String {
    let name = view.avatar.name.as_deref().unwrap_or("anonymous");
    let body = match &view.body {
        RenderedBody::Plain(text) | RenderedBody::Html(text) => text.as_str(),
    };
    format!("{name}:\n{body}\n")
}

pub fn drafts(viewer: &DraftViewer) -> String {
    let mut out = String::new();
    if viewer.is_loading() {
        out.push_str("Drafts are loading...\n");
    }
    for (index, draft) in viewer.streamed_drafts().iter().enumerate() {
        let marker = if viewer.is_expanded(index) { "-" } else { "+" };
        let _ = writeln!(out, "{marker} draft {}", index + 1);
        if viewer.is_expanded(index) {
            let _ = writeln!(out, "    {draft}");
        }
    }
    if let Some(params) = viewer.work_parameters() {
        let _ = writeln!(out, "model: {}", params.model_config.model_id);
        for (key, value) in params.sampling_parameters.iter() {
            if let Some(value) = value {
                let _ = writeln!(out, "  {key}: {value}");
            }
        }
        if let Some(seed) = params.seed {
            let _ = writeln!(out, "  seed: {seed}");
        }
    }
    out
}

pub fn docs_links(index: &DocsIndex, sidebar: &str) -> String {
    let mut out = String::new();
    for link in index.links(sidebar) {
        let indent = "  ".repeat(link.categories.len());
        let _ = writeln!(out, "{indent}{}  {}", link.label, link.href);
    }
    out
}
