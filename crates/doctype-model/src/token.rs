// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The closed vocabulary of raw `fieldtype` tags.
//!
//! Tags are matched exactly as the server sends them (`"Dynamic Link"`, `"Datetime"`, ...). A tag
//! outside the vocabulary is kept as [`RawFieldType::Unsupported`] so that decoding a record
//! never fails because of a field type introduced by a newer server.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FieldTypeToken {
    Link,
    Data,
    #[serde(rename = "Dynamic Link")]
    DynamicLink,
    Check,
    Select,
    Table,
    Attach,
    #[serde(rename = "Attach Image")]
    AttachImage,
    #[serde(rename = "Text Editor")]
    TextEditor,
    #[serde(rename = "Datetime")]
    DateTime,
    Date,
    Time,
    Barcode,
    Button,
    Code,
    Color,
    Heading,
    #[serde(rename = "Column Break")]
    ColumnBreak,
    Currency,
    Float,
    Geolocation,
    #[serde(rename = "HTML Editor")]
    HtmlEditor,
    #[serde(rename = "HTML")]
    Html,
    Image,
    Icon,
    Int,
    Autocomplete,
    #[serde(rename = "Small Text")]
    SmallText,
    #[serde(rename = "Long Text")]
    LongText,
    Text,
    #[serde(rename = "Markdown Editor")]
    MarkdownEditor,
    Password,
    Percent,
    Rating,
    #[serde(rename = "Read Only")]
    ReadOnly,
    #[serde(rename = "Section Break")]
    SectionBreak,
    #[serde(rename = "Tab Break")]
    TabBreak,
    Note,
    Signature,
    #[serde(rename = "Table MultiSelect")]
    TableMultiSelect,
    Duration,
    #[serde(rename = "JSON")]
    Json,
}

impl FieldTypeToken {
    pub const ALL: [FieldTypeToken; 42] = [
        FieldTypeToken::Link,
        FieldTypeToken::Data,
        FieldTypeToken::DynamicLink,
        FieldTypeToken::Check,
        FieldTypeToken::Select,
        FieldTypeToken::Table,
        FieldTypeToken::Attach,
        FieldTypeToken::AttachImage,
        FieldTypeToken::TextEditor,
        FieldTypeToken::DateTime,
        FieldTypeToken::Date,
        FieldTypeToken::Time,
        FieldTypeToken::Barcode,
        FieldTypeToken::Button,
        FieldTypeToken::Code,
        FieldTypeToken::Color,
        FieldTypeToken::Heading,
        FieldTypeToken::ColumnBreak,
        FieldTypeToken::Currency,
        FieldTypeToken::Float,
        FieldTypeToken::Geolocation,
        FieldTypeToken::HtmlEditor,
        FieldTypeToken::Html,
        FieldTypeToken::Image,
        FieldTypeToken::Icon,
        FieldTypeToken::Int,
        FieldTypeToken::Autocomplete,
        FieldTypeToken::SmallText,
        FieldTypeToken::LongText,
        FieldTypeToken::Text,
        FieldTypeToken::MarkdownEditor,
        FieldTypeToken::Password,
        FieldTypeToken::Percent,
        FieldTypeToken::Rating,
        FieldTypeToken::ReadOnly,
        FieldTypeToken::SectionBreak,
        FieldTypeToken::TabBreak,
        FieldTypeToken::Note,
        FieldTypeToken::Signature,
        FieldTypeToken::TableMultiSelect,
        FieldTypeToken::Duration,
        FieldTypeToken::Json,
    ];

    /// The tag as it appears in a `fieldtype` value
    pub fn wire_name(&self) -> &'static str {
        match self {
            FieldTypeToken::Link => "Link",
            FieldTypeToken::Data => "Data",
            FieldTypeToken::DynamicLink => "Dynamic Link",
            FieldTypeToken::Check => "Check",
            FieldTypeToken::Select => "Select",
            FieldTypeToken::Table => "Table",
            FieldTypeToken::Attach => "Attach",
            FieldTypeToken::AttachImage => "Attach Image",
            FieldTypeToken::TextEditor => "Text Editor",
            FieldTypeToken::DateTime => "Datetime",
            FieldTypeToken::Date => "Date",
            FieldTypeToken::Time => "Time",
            FieldTypeToken::Barcode => "Barcode",
            FieldTypeToken::Button => "Button",
            FieldTypeToken::Code => "Code",
            FieldTypeToken::Color => "Color",
            FieldTypeToken::Heading => "Heading",
            FieldTypeToken::ColumnBreak => "Column Break",
            FieldTypeToken::Currency => "Currency",
            FieldTypeToken::Float => "Float",
            FieldTypeToken::Geolocation => "Geolocation",
            FieldTypeToken::HtmlEditor => "HTML Editor",
            FieldTypeToken::Html => "HTML",
            FieldTypeToken::Image => "Image",
            FieldTypeToken::Icon => "Icon",
            FieldTypeToken::Int => "Int",
            FieldTypeToken::Autocomplete => "Autocomplete",
            FieldTypeToken::SmallText => "Small Text",
            FieldTypeToken::LongText => "Long Text",
            FieldTypeToken::Text => "Text",
            FieldTypeToken::MarkdownEditor => "Markdown Editor",
            FieldTypeToken::Password => "Password",
            FieldTypeToken::Percent => "Percent",
            FieldTypeToken::Rating => "Rating",
            FieldTypeToken::ReadOnly => "Read Only",
            FieldTypeToken::SectionBreak => "Section Break",
            FieldTypeToken::TabBreak => "Tab Break",
            FieldTypeToken::Note => "Note",
            FieldTypeToken::Signature => "Signature",
            FieldTypeToken::TableMultiSelect => "Table MultiSelect",
            FieldTypeToken::Duration => "Duration",
            FieldTypeToken::Json => "JSON",
        }
    }
}

impl Display for FieldTypeToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// A `fieldtype` value as received, known or not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawFieldType {
    Known(FieldTypeToken),
    Unsupported(String),
}

impl RawFieldType {
    pub fn token(&self) -> Option<FieldTypeToken> {
        match self {
            RawFieldType::Known(token) => Some(*token),
            RawFieldType::Unsupported(_) => None,
        }
    }
}

impl From<FieldTypeToken> for RawFieldType {
    fn from(token: FieldTypeToken) -> Self {
        RawFieldType::Known(token)
    }
}

impl Display for RawFieldType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RawFieldType::Known(token) => token.fmt(f),
            RawFieldType::Unsupported(tag) => f.write_str(tag),
        }
    }
}
