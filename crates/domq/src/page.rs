//! Page - shared handle to a document

use std::cell::{Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};

use domq_dom::Document;
use domq_html::HtmlParser;
use domq_net::{ClientConfig, HttpTransport, NetError};

use crate::{Config, Error, Selection};

/// A document plus the settings selections on it use.
///
/// Cloning is cheap and every clone sees the same document. Listeners are
/// owned by the document, so a handler that needs the page should capture
/// a [`WeakPage`]; a captured `Page` keeps the document alive forever.
#[derive(Debug, Clone)]
pub struct Page {
    document: Rc<RefCell<Document>>,
    config: Rc<Config>,
}

impl Page {
    /// Empty html/head/body document
    pub fn new(config: Config) -> Self {
        let document = Document::new(&config.base_url);
        Self::from_document(document, config)
    }

    /// Parse `html` with the default configuration
    pub fn from_html(html: &str) -> Result<Self, Error> {
        Self::from_html_with_config(html, Config::default())
    }

    pub fn from_html_with_config(html: &str, config: Config) -> Result<Self, Error> {
        let document = HtmlParser::new().parse_with_url(html, &config.base_url)?;
        Ok(Self::from_document(document, config))
    }

    pub fn from_document(document: Document, config: Config) -> Self {
        Self {
            document: Rc::new(RefCell::new(document)),
            config: Rc::new(config),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Borrow the document.
    ///
    /// # Panics
    /// If a `document_mut` borrow is alive.
    pub fn document(&self) -> Ref<'_, Document> {
        self.document.borrow()
    }

    /// Mutably borrow the document.
    ///
    /// # Panics
    /// If any other borrow is alive.
    pub fn document_mut(&self) -> RefMut<'_, Document> {
        self.document.borrow_mut()
    }

    /// Whether two handles share a document
    pub fn same_document(&self, other: &Page) -> bool {
        Rc::ptr_eq(&self.document, &other.document)
    }

    /// Handle that does not keep the document alive
    pub fn downgrade(&self) -> WeakPage {
        WeakPage {
            document: Rc::downgrade(&self.document),
            config: Rc::downgrade(&self.config),
        }
    }

    /// Every element matching `selector`, in document order
    pub fn select(&self, selector: &str) -> Selection {
        Selection::new(self.clone(), selector)
    }

    /// HTTP transport resolving relative URLs against this page
    pub fn transport(&self) -> Result<HttpTransport, NetError> {
        let client = ClientConfig::builder()
            .base_url(&self.config.base_url)
            .build();
        HttpTransport::with_config(client)
    }
}

/// Non-owning [`Page`] handle for event handlers
#[derive(Debug, Clone)]
pub struct WeakPage {
    document: Weak<RefCell<Document>>,
    config: Weak<Config>,
}

impl WeakPage {
    /// The page, while any `Page` for it is still alive
    pub fn upgrade(&self) -> Option<Page> {
        Some(Page {
            document: self.document.upgrade()?,
            config: self.config.upgrade()?,
        })
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
