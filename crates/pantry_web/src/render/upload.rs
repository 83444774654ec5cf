use axum::response::Html;
use pantry_ids::PantryId;
use pantry_protocol::UploadOutcome;

use super::{escape, group_digits, layout};
use crate::upload::{UploadResult, UploadView};

pub fn page(pantry_id: &PantryId, view: &UploadView) -> Html<String> {
    let pantry = escape(pantry_id.as_str());

    let mut body = format!(
        r#"<header class="bar">
<a href="/" aria-label="Back">&larr;</a>
<h1>Upload photo</h1>
<p class="muted">Pantry: {pantry} &middot; Choose photos or drag them onto the picker</p>
</header>
<main class="narrow">
<form class="picker" method="post" action="/{pantry}/upload/select" enctype="multipart/form-data">
<label class="drop">
<input type="file" name="files" accept="image/*" multiple aria-label="Select image">
<span>Tap to select or drag and drop here</span>
<span class="muted">PNG, JPG, WEBP</span>
</label>
<button type="submit" class="secondary">Use these photos</button>
</form>
"#
    );

    if !view.files.is_empty() {
        body.push_str(&format!(
            r#"<section aria-label="Upload preview">
<h2>Selected ({})</h2>
<ul class="grid">
"#,
            view.files.len()
        ));
        for (index, file) in view.files.iter().enumerate() {
            body.push_str(&format!(
                r#"<li class="thumb">
<img src="/{pantry}/upload/preview/{preview}" alt="Preview {n}">
<form method="post" action="/{pantry}/upload/remove/{index}"><button type="submit" class="remove" aria-label="Remove image {n}">&times;</button></form>
<span class="name">{name}</span>
</li>
"#,
                preview = escape(file.preview_id.as_str()),
                n = index + 1,
                name = escape(&file.filename),
            ));
        }
        body.push_str("</ul>\n");

        let (disabled, label) = if view.submitting {
            (" disabled", "Sending\u{2026}")
        } else {
            ("", "Send to server")
        };
        body.push_str(&format!(
            r#"<form method="post" action="/{pantry}/upload/submit"><button type="submit"{disabled}>{label}</button></form>
</section>
"#
        ));
    }

    if let Some(result) = &view.last_result {
        body.push_str(&result_block(result));
    }

    body.push_str(&format!(
        r#"<p><a href="/{pantry}/review">Review detected inventory</a></p>
</main>"#
    ));

    layout("Upload Inventory", &body)
}

fn result_block(result: &UploadResult) -> String {
    match result {
        UploadResult::Failed(message) => format!(
            r#"<div class="result"><p class="error">{}</p></div>
"#,
            escape(message)
        ),
        UploadResult::Accepted(outcome) => accepted_block(outcome),
    }
}

fn accepted_block(outcome: &UploadOutcome) -> String {
    let mut out = format!(
        r#"<div class="result">
<p class="ok">{}</p>
"#,
        escape(&outcome.summary())
    );

    if !outcome.files.is_empty() {
        out.push_str("<ul class=\"files\">\n");
        for file in &outcome.files {
            out.push_str(&format!(
                "<li>{} ({} bytes)</li>\n",
                escape(&file.filename),
                group_digits(file.size_bytes)
            ));
        }
        out.push_str("</ul>\n");
    }

    if let Some(inventory) = outcome.inventory.as_ref().filter(|inv| !inv.is_empty()) {
        out.push_str(
            "<div class=\"inventory\">\n<p><strong>Inventory by category</strong></p>\n<ul>\n",
        );
        for (category, quantity) in inventory.detected() {
            out.push_str(&format!(
                "<li><span>{}</span><span>{}</span></li>\n",
                escape(category),
                quantity
            ));
        }
        out.push_str("</ul>\n");
        if inventory.is_all_zero() {
            out.push_str("<p class=\"muted\">No quantities detected.</p>\n");
        }
        out.push_str("</div>\n");
    }

    out.push_str("</div>\n");
    out
}
