use axum::response::Html;
use pantry_ids::PantryId;
use pantry_protocol::defaults::HANDOFF_STORAGE_KEY;

use super::{escape, layout};
use crate::review::{DraftReview, ReviewState};

pub fn page(pantry_id: &PantryId, state: &ReviewState) -> Html<String> {
    let pantry = escape(pantry_id.as_str());

    let content = match state {
        ReviewState::Loading => format!(
            r#"<div class="card">
<p class="muted">Loading draft&hellip;</p>
<p><a href="/{pantry}/review">Refresh</a></p>
</div>"#
        ),
        ReviewState::LoadFailed(message) => format!(
            r#"<div class="card">
<p class="error">{message}</p>
<p><a href="/{pantry}/upload">Go to upload page</a></p>
</div>"#,
            message = escape(message),
        ),
        ReviewState::Loaded(review) => editor(&pantry, review, false),
        ReviewState::HandoffPrepared(review) => editor(&pantry, review, true),
    };

    layout(
        "Review Inventory",
        &format!(
            r#"<header class="bar">
<h1>Review detected inventory</h1>
<p class="muted">Pantry: {pantry}</p>
</header>
<main class="wide">
{content}
</main>"#
        ),
    )
}

fn input_id(category: &str) -> String {
    format!("qty-{}", category.replace(' ', "-"))
}

fn editor(pantry: &str, review: &DraftReview, handoff_ready: bool) -> String {
    let photos = review.draft.photo_count();
    let photos = if photos > 0 {
        format!(r#"<p class="muted small">Photos processed: {}</p>"#, photos)
    } else {
        String::new()
    };

    let mut rows = String::new();
    for (category, quantity) in review.inventory().rows() {
        rows.push_str(&format!(
            r#"<li class="row"><label for="{id}">{label}</label><input id="{id}" name="{name}" type="number" min="0" value="{quantity}"></li>
"#,
            id = escape(&input_id(category)),
            label = escape(category),
            name = escape(category),
        ));
    }

    let ready = if handoff_ready {
        format!(
            r#"<div class="alert ok">
<p><strong>Handoff payload saved.</strong></p>
<p>Teammate can read <code>{key}</code> from <a href="/{pantry}/review/handoff">this session's handoff buffer</a>.</p>
</div>"#,
            key = HANDOFF_STORAGE_KEY,
        )
    } else {
        String::new()
    };

    format!(
        r#"<div class="card">
<p><strong>Detected categories (editable)</strong></p>
<p>Data loaded from backend draft. Edit and prepare teammate handoff.</p>
{photos}
</div>
<form method="post" action="/{pantry}/review/edit" class="card">
<ul class="rows">
{rows}</ul>
<div class="actions">
<button type="submit" class="secondary">Save edits</button>
<button type="submit" formaction="/{pantry}/review/handoff">Prepare handoff data for teammate</button>
</div>
</form>
{ready}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pantry_protocol::{InventoryDraft, CATEGORIES};

    fn pantry() -> PantryId {
        PantryId::parse("p123").unwrap()
    }

    fn loaded() -> ReviewState {
        ReviewState::Loaded(DraftReview {
            draft: InventoryDraft {
                pantry_id: pantry(),
                inventory: [("Beverages".to_string(), 3), ("Cereal".to_string(), 0)]
                    .into_iter()
                    .collect(),
                files: Vec::new(),
            },
        })
    }

    #[test]
    fn test_every_category_has_an_input() {
        let Html(html) = page(&pantry(), &loaded());
        for category in CATEGORIES {
            assert!(html.contains(&format!(r#"name="{}""#, category)), "{}", category);
        }
        assert!(html.contains(r#"name="Beverages" type="number" min="0" value="3""#));
        assert!(html.contains(r#"name="Cereal" type="number" min="0" value="0""#));
        assert!(!html.contains("Photos processed"));
        assert!(!html.contains("Handoff payload saved."));
    }

    #[test]
    fn test_failure_links_to_upload() {
        let Html(html) = page(&pantry(), &ReviewState::LoadFailed("No draft".into()));
        assert!(html.contains(r#"<a href="/p123/upload">Go to upload page</a>"#));
        assert!(!html.contains(r#"type="number""#));
    }

    #[test]
    fn test_prepared_notice() {
        let ReviewState::Loaded(review) = loaded() else {
            unreachable!()
        };
        let Html(html) = page(&pantry(), &ReviewState::HandoffPrepared(review));
        assert!(html.contains("Handoff payload saved."));
        assert!(html.contains("inventoryReviewHandoff"));
    }
}
