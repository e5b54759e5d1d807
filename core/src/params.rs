//! Query-string assembly for GET and DELETE.

use std::collections::HashMap;

use url::form_urlencoded;

/// Query options passed to `ApiClient::get` and `ApiClient::delete`.
pub type Params = HashMap<String, String>;

/// Append `params` to `path` as a form-encoded query string.
///
/// Keys are emitted in lexicographic order. An existing query is extended
/// with `&`; a path that already ends in `?` or `&` is extended directly.
/// An empty `params` leaves `path` untouched.
pub fn encode_params(path: &str, params: &Params) -> String {
    if params.is_empty() {
        return path.to_string();
    }

    let mut pairs: Vec<(&String, &String)> = params.iter().collect();
    pairs.sort();
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();

    let mut url = path.to_string();
    if !url.contains('?') {
        url.push('?');
    }
    if !(url.ends_with('?') || url.ends_with('&')) {
        url.push('&');
    }
    url.push_str(&query);
    url
}
