//! URL assembly for the request pipeline.
//!
//! Building is plain string concatenation plus form-urlencoded query
//! fragments. `url::Url::join` is deliberately not used: its relative-path
//! resolution would silently rewrite endpoints, while the wire contract is
//! "base + endpoint, collapsing one redundant slash".

use url::form_urlencoded;

use crate::config::QueryDefaults;

/// Join base and endpoint, collapsing exactly one redundant slash when the
/// base ends with `/` and the endpoint starts with one.
pub(crate) fn join(base: &str, endpoint: &str) -> String {
    if base.ends_with('/') && endpoint.starts_with('/') {
        format!("{}{}", base, &endpoint[1..])
    } else {
        format!("{}{}", base, endpoint)
    }
}

/// Append an encoded fragment, honoring a pre-existing `?` in the URL.
fn push_query(url: &mut String, fragment: &str) {
    if fragment.is_empty() {
        return;
    }
    url.push(if url.contains('?') { '&' } else { '?' });
    url.push_str(fragment);
}

fn encode_pairs<'a>(pairs: impl Iterator<Item = (&'a str, &'a str)>) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (name, value) in pairs {
        serializer.append_pair(name, value);
    }
    serializer.finish()
}

/// Build the full request URL.
///
/// Config query defaults come first, then request params; on key collision
/// request params win and the colliding default is dropped. Params with a
/// `None` value are skipped entirely.
pub(crate) fn build(
    base: &str,
    endpoint: &str,
    defaults: Option<&QueryDefaults>,
    params: &[(String, Option<String>)],
) -> String {
    let mut url = join(base, endpoint);

    let live: Vec<(&str, &str)> = params
        .iter()
        .filter_map(|(name, value)| value.as_deref().map(|v| (name.as_str(), v)))
        .collect();
    let shadowed = |name: &str| live.iter().any(|(n, _)| *n == name);

    if let Some(defaults) = defaults {
        let fragment = match defaults {
            QueryDefaults::Raw(raw) => {
                let collides = form_urlencoded::parse(raw.as_bytes())
                    .any(|(name, _)| shadowed(name.as_ref()));
                if collides {
                    let kept: Vec<(String, String)> = form_urlencoded::parse(raw.as_bytes())
                        .filter(|(name, _)| !shadowed(name.as_ref()))
                        .map(|(name, value)| (name.into_owned(), value.into_owned()))
                        .collect();
                    encode_pairs(kept.iter().map(|(n, v)| (n.as_str(), v.as_str())))
                } else {
                    // No collision: keep the raw fragment byte-for-byte.
                    raw.clone()
                }
            }
            QueryDefaults::Pairs(pairs) => encode_pairs(
                pairs
                    .iter()
                    .filter(|(name, _)| !shadowed(name))
                    .map(|(n, v)| (n.as_str(), v.as_str())),
            ),
        };
        push_query(&mut url, &fragment);
    }

    push_query(&mut url, &encode_pairs(live.iter().copied()));
    url
}
