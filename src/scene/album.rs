/// Ordered list of photo URLs shown on the tree
///
/// An album may start out holding a single placeholder image; the first real
/// photo replaces it instead of joining it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhotoAlbum {
    urls: Vec<String>,
    placeholder: Option<String>,
}

impl PhotoAlbum {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_placeholder(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            urls: vec![url.clone()],
            placeholder: Some(url),
        }
    }

    pub fn from_urls(urls: Vec<String>) -> Self {
        Self {
            urls,
            placeholder: None,
        }
    }

    pub fn shows_placeholder(&self) -> bool {
        match (&self.placeholder, self.urls.as_slice()) {
            (Some(p), [only]) => p == only,
            _ => false,
        }
    }

    pub fn add(&mut self, url: impl Into<String>) {
        if self.shows_placeholder() {
            self.urls.clear();
        }
        self.urls.push(url.into());
    }

    /// Remove one photo; returns whether it was present
    pub fn remove(&mut self, url: &str) -> bool {
        let before = self.urls.len();
        self.urls.retain(|u| u != url);
        self.urls.len() != before
    }

    pub fn clear(&mut self) {
        self.urls.clear();
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
