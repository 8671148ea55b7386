use askama::Template;
use askama_web::WebTemplate;
use chrono::{Datelike, Utc};

use crate::constants::DOWNLOAD_FILENAME;

#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub(crate) struct HomeTemplate {
    pub(crate) year: i32,
    pub(crate) download_filename: &'static str,
}

/// handles the / GET
pub(crate) async fn home_handler() -> HomeTemplate {
    HomeTemplate {
        year: Utc::now().year(),
        download_filename: DOWNLOAD_FILENAME,
    }
}
