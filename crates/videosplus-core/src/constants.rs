//! Fixed names shared between the bootstrap tooling and the service it prepares.

/// Canonical key of the metadata document inside the bucket.
pub const DEFAULT_METADATA_KEY: &str = "metadata/videosplus-data.json";

/// File name used when the document is uploaded through the service.
pub const METADATA_FILE_NAME: &str = "videosplus-data.json";

/// Logical folders that receive a `.keep` marker on bootstrap.
pub const MARKER_FOLDERS: [&str; 3] = ["videos", "thumbnails", "metadata"];

/// Marker object name placed under each logical folder.
pub const MARKER_FILE_NAME: &str = ".keep";

pub const ADMIN_USER_ID: &str = "admin-001";
pub const ADMIN_EMAIL: &str = "admin@gmail.com";
pub const ADMIN_NAME: &str = "Administrador";

/// Hex SHA-256 of the bootstrap administrator password (`admin123`).
pub const ADMIN_PASSWORD_SHA256: &str =
    "240be518fabd2724ddb6f04eeb1da5967448d7e831c08c8fa822809f74c720a9";

pub const DEFAULT_SITE_NAME: &str = "VideosPlus";
pub const DEFAULT_VIDEO_LIST_TITLE: &str = "Available Videos";
pub const DEFAULT_EMAIL_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_EMAIL_PORT: &str = "587";

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Build the marker key for a logical folder, e.g. `videos/.keep`.
pub fn marker_key(folder: &str) -> String {
    format!("{}/{}", folder, MARKER_FILE_NAME)
}
