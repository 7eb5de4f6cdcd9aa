/// The artist-search version.
///
/// Defaults to the workspace Cargo package version. Release builds may inject a tag version via
/// the `ARTIST_SEARCH_VERSION` environment variable.
pub const ARTIST_SEARCH_VERSION: &str = match option_env!("ARTIST_SEARCH_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};
