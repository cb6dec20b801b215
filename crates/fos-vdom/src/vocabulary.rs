//! Supported tag, method and event names
//!
//! Built once and handed to the engine; nothing here is mutable after
//! construction.

/// Tag names known to work with the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagNames {
    pub body: &'static str,
    pub div: &'static str,
    pub script: &'static str,
    pub header: &'static str,
    pub footer: &'static str,
    pub input: &'static str,
    pub img: &'static str,
    pub head: &'static str,
    pub span: &'static str,
    pub style: &'static str,
    pub button: &'static str,
    pub section: &'static str,
    pub article: &'static str,
    pub pre: &'static str,
    pub code: &'static str,
}

impl Default for TagNames {
    fn default() -> Self {
        Self {
            body: "body",
            div: "div",
            script: "script",
            header: "header",
            footer: "footer",
            input: "input",
            img: "img",
            head: "head",
            span: "span",
            style: "style",
            button: "button",
            section: "section",
            article: "article",
            pre: "pre",
            code: "code",
        }
    }
}

impl TagNames {
    pub fn all(&self) -> [&'static str; 15] {
        [
            self.body, self.div, self.script, self.header, self.footer,
            self.input, self.img, self.head, self.span, self.style,
            self.button, self.section, self.article, self.pre, self.code,
        ]
    }
}

/// Surface method names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodNames {
    pub create_element: &'static str,
    pub append_child: &'static str,
    pub get_element_by_id: &'static str,
    pub set_attribute: &'static str,
    pub add_event_listener: &'static str,
    pub toggle: &'static str,
    pub contains: &'static str,
    pub add_class: &'static str,
    pub scroll_into_view: &'static str,
}

impl Default for MethodNames {
    fn default() -> Self {
        Self {
            create_element: "createElement",
            append_child: "appendChild",
            get_element_by_id: "getElementById",
            set_attribute: "setAttribute",
            add_event_listener: "addEventListener",
            toggle: "toggle",
            contains: "contains",
            add_class: "add",
            scroll_into_view: "scrollIntoView",
        }
    }
}

impl MethodNames {
    pub fn all(&self) -> [&'static str; 9] {
        [
            self.create_element, self.append_child, self.get_element_by_id,
            self.set_attribute, self.add_event_listener, self.toggle,
            self.contains, self.add_class, self.scroll_into_view,
        ]
    }
}

/// Interaction event names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventNames {
    pub click: &'static str,
    pub input: &'static str,
    pub keyup: &'static str,
}

impl Default for EventNames {
    fn default() -> Self {
        Self { click: "click", input: "input", keyup: "keyup" }
    }
}

impl EventNames {
    pub fn all(&self) -> [&'static str; 3] {
        [self.click, self.input, self.keyup]
    }
}

/// The closed vocabulary the engine is configured with
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    pub tags: TagNames,
    pub methods: MethodNames,
    pub events: EventNames,
}

impl Vocabulary {
    /// `html` and `title` are accepted as well since bootstrap acquires them.
    pub fn is_supported_tag(&self, tag: &str) -> bool {
        tag == "html" || tag == "title" || self.tags.all().iter().any(|t| *t == tag)
    }

    pub fn is_supported_method(&self, method: &str) -> bool {
        self.methods.all().iter().any(|m| *m == method)
    }

    pub fn is_supported_event(&self, event: &str) -> bool {
        self.events.all().iter().any(|e| *e == event)
    }
}
