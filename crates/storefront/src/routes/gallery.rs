//! Gallery route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::state::AppState;

/// Gallery image display data for templates.
#[derive(Clone)]
pub struct GalleryImageView {
    pub url: String,
    pub alt: String,
}

/// Gallery page template.
#[derive(Template, WebTemplate)]
#[template(path = "gallery.html")]
pub struct GalleryTemplate {
    pub images: Vec<GalleryImageView>,
}

/// Display the gallery page.
///
/// Images come from the Cloudinary list cache (~1h TTL); a failed fetch
/// degrades to an empty gallery rather than an error page.
#[instrument(skip(app))]
pub async fn index(State(app): State<AppState>) -> impl IntoResponse {
    let tag = &app.config().gallery.tag;

    let images = match app.gallery().images_for_tag(tag).await {
        Ok(images) => images
            .iter()
            .map(|image| GalleryImageView {
                url: image.url(app.gallery().cloud_name()),
                alt: image.public_id.clone(),
            })
            .collect(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch gallery images");
            Vec::new()
        }
    };

    GalleryTemplate { images }
}
