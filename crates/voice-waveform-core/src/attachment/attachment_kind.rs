use std::fmt;

/// Content type of a chat attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentKind {
    /// Voice message recorded in the client.
    VoiceMessage,
    /// Generic audio file.
    Audio,
    /// Anything else (images, video, files).
    Other,
}

impl AttachmentKind {
    /// Whether attachments of this kind can produce a waveform.
    pub fn is_audio(self) -> bool {
        matches!(self, Self::VoiceMessage | Self::Audio)
    }
}

impl fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::VoiceMessage => "voice-message",
            Self::Audio => "audio",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}
