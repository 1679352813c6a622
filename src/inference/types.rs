use chrono::{DateTime, Local};

/// Who authored a message. Closed set: every match on it is exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "Assistant",
        }
    }
}

/// One entry in the conversation log.
///
/// `role` and `image` never change after creation. `content` only grows,
/// and only while the message is the log's receiving assistant message.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Data URL of the image attached at submission time (user messages only).
    pub image: Option<ImageEcho>,
    pub created_at: DateTime<Local>,
}

/// Snapshot of a submitted attachment, echoed into the user's message.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageEcho {
    pub file_name: String,
    pub data_url: String,
}

impl Message {
    pub fn user(content: String, image: Option<ImageEcho>) -> Self {
        Self {
            role: Role::User,
            content,
            image,
            created_at: Local::now(),
        }
    }

    pub fn assistant(content: String) -> Self {
        Self {
            role: Role::Assistant,
            content,
            image: None,
            created_at: Local::now(),
        }
    }
}

/// Ordered, append-only conversation history.
///
/// At most one assistant message is "receiving" at a time, and when one is,
/// it is the last element.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ConversationLog {
    messages: Vec<Message>,
    receiving: bool,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// The assistant message currently being streamed into, if any.
    pub fn receiving(&self) -> Option<&Message> {
        if self.receiving { self.messages.last() } else { None }
    }

    pub fn is_receiving(&self) -> bool {
        self.receiving
    }

    /// Appends a finished message. Closes any receiving message first.
    pub fn push(&mut self, message: Message) {
        self.receiving = false;
        self.messages.push(message);
    }

    /// Appends an empty assistant message that becomes the fragment target.
    pub fn begin_assistant(&mut self) {
        self.push(Message::assistant(String::new()));
        self.receiving = true;
    }

    /// Appends a fragment verbatim to the receiving message.
    /// Opens a receiving message first if none is open.
    pub fn append_fragment(&mut self, fragment: &str) {
        if !self.receiving {
            self.begin_assistant();
        }
        if let Some(message) = self.messages.last_mut() {
            message.content.push_str(fragment);
        }
    }

    /// Freezes the receiving message, if any, and returns it.
    pub fn finish_receiving(&mut self) -> Option<&Message> {
        if !std::mem::take(&mut self.receiving) {
            return None;
        }
        self.messages.last()
    }
}

/// One event of a streamed backend response, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamChunk {
    /// The backend accepted the request; fragments follow.
    Accepted,
    /// One decoded body chunk.
    Fragment(String),
}
