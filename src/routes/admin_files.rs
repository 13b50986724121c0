use std::path::PathBuf;

use rocket::fs::NamedFile;
use rocket::response::Redirect;
use rocket::{get, State};

use crate::modules::helpers::config::Config;
use crate::modules::helpers::guards::admin::AdminUser;

#[get("/admin")]
pub fn admin_redirect(_admin: AdminUser) -> Redirect {
    Redirect::to("/admin/")
}

/// # admin page files
/// serves `<public dir>/admin`, only to the admin
#[get("/admin/<path..>")]
pub async fn admin_files(_admin: AdminUser, path: PathBuf, config: &State<Config>) -> Option<NamedFile> {
    let mut file = config.public_dir.join("admin").join(path);
    if file.is_dir() {
        file.push("index.html");
    }

    NamedFile::open(file).await.ok()
}
