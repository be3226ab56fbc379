mod attachment_kind;
mod attachment_source;

pub use {attachment_kind::AttachmentKind, attachment_source::AttachmentSource};
