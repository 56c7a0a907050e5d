use shared::protocol::RECIPIENT_NAME_PARAM;
use url::Url;

/// The browser-ish surface the checkout page drives.
pub trait Navigator: Send + Sync {
    /// Replaces the current location without leaving the page.
    fn replace_location(&self, location: &Url);
    /// Full navigation away from the page.
    fn assign(&self, url: &Url);
    fn back(&self);
}

/// Non-empty `recipientName` query value of `location`, if any.
pub fn recipient_name_from(location: &Url) -> Option<String> {
    location
        .query_pairs()
        .find(|(key, _)| key == RECIPIENT_NAME_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// `location` with its query replaced by a single `recipientName` pair.
pub fn with_recipient_name(location: &Url, recipient_name: &str) -> Url {
    let mut next = location.clone();
    next.query_pairs_mut()
        .clear()
        .append_pair(RECIPIENT_NAME_PARAM, recipient_name);
    next
}
