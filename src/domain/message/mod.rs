//! Message module - structured chat content.
//!
//! A small, typed subset of Slack Block Kit: enough for headers, dividers,
//! text sections with an optional button, and action rows. Serializes to the
//! JSON shape `chat.postMessage` expects.

use serde::Serialize;

/// Action id carried by the per-document export buttons.
pub const EXPORT_ACTION_ID: &str = "export_pdf";

/// Action id of the download link button.
pub const DOWNLOAD_ACTION_ID: &str = "download_pdf";

/// Text object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextObject {
    PlainText { text: String },
    Mrkdwn { text: String },
}

impl TextObject {
    pub fn plain(text: impl Into<String>) -> Self {
        TextObject::PlainText { text: text.into() }
    }

    pub fn mrkdwn(text: impl Into<String>) -> Self {
        TextObject::Mrkdwn { text: text.into() }
    }

    pub fn text(&self) -> &str {
        match self {
            TextObject::PlainText { text } | TextObject::Mrkdwn { text } => text,
        }
    }
}

/// Interactive element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Button {
        text: TextObject,
        action_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
}

impl Element {
    /// Button that posts its value back as an interaction.
    pub fn action_button(
        label: impl Into<String>,
        action_id: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Element::Button {
            text: TextObject::plain(label),
            action_id: action_id.into(),
            value: Some(value.into()),
            url: None,
        }
    }

    /// Button that opens a URL in the browser.
    pub fn link_button(
        label: impl Into<String>,
        action_id: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Element::Button {
            text: TextObject::plain(label),
            action_id: action_id.into(),
            value: None,
            url: Some(url.into()),
        }
    }
}

/// Layout block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Header {
        text: TextObject,
    },
    Divider,
    Section {
        text: TextObject,
        #[serde(skip_serializing_if = "Option::is_none")]
        accessory: Option<Element>,
    },
    Actions {
        elements: Vec<Element>,
    },
}

impl Block {
    pub fn header(text: impl Into<String>) -> Self {
        Block::Header {
            text: TextObject::plain(text),
        }
    }

    pub fn section(text: impl Into<String>) -> Self {
        Block::Section {
            text: TextObject::mrkdwn(text),
            accessory: None,
        }
    }

    pub fn section_with_button(text: impl Into<String>, button: Element) -> Self {
        Block::Section {
            text: TextObject::mrkdwn(text),
            accessory: Some(button),
        }
    }
}

/// A chat message: fallback text plus optional blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    /// Shown in notifications and by clients that cannot render blocks.
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<Block>,
}

impl ChatMessage {
    /// Plain text message.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            blocks: Vec::new(),
        }
    }

    /// Block message with fallback text.
    pub fn with_blocks(text: impl Into<String>, blocks: Vec<Block>) -> Self {
        Self {
            text: text.into(),
            blocks,
        }
    }

    /// All section blocks, in order.
    pub fn sections(&self) -> Vec<(&TextObject, Option<&Element>)> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                Block::Section { text, accessory } => Some((text, accessory.as_ref())),
                _ => None,
            })
            .collect()
    }

    /// All buttons, whether section accessories or in action rows.
    pub fn buttons(&self) -> Vec<&Element> {
        self.blocks
            .iter()
            .flat_map(|block| match block {
                Block::Section {
                    accessory: Some(button),
                    ..
                } => vec![button],
                Block::Actions { elements } => elements.iter().collect(),
                _ => Vec::new(),
            })
            .collect()
    }

    /// Header text, if the message starts with a header block.
    pub fn header(&self) -> Option<&str> {
        match self.blocks.first() {
            Some(Block::Header { text }) => Some(text.text()),
            _ => None,
        }
    }
}
