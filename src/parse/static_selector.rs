use std::sync::OnceLock;

use scraper::Selector;

/// A selector for the hall page markup (`h2.menuTitle`, `h4`, `li`,
/// `.item-name`), compiled the first time a page is read.
#[derive(Debug)]
pub(super) struct StaticSelector {
    compiled: OnceLock<Selector>,
    source: &'static str,
}

impl StaticSelector {
    pub(super) const fn new(source: &'static str) -> Self {
        Self {
            compiled: OnceLock::new(),
            source,
        }
    }
}

impl core::ops::Deref for StaticSelector {
    type Target = Selector;

    fn deref(&self) -> &Selector {
        // the sources are literals, so a bad one is a bug in this module
        self.compiled.get_or_init(|| {
            Selector::parse(self.source)
                .unwrap_or_else(|e| panic!("menu selector `{}` is invalid: {e:?}", self.source))
        })
    }
}

/// Declares a lazily compiled selector: `static_selector!(NAME <- "css")`.
#[macro_export]
macro_rules! static_selector {
    ($name: ident <- $css: literal) => {
        static $name: $crate::parse::static_selector::StaticSelector =
            $crate::parse::static_selector::StaticSelector::new($css);
    };
}
