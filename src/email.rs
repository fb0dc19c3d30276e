/// Generic email message types, independent of any provider.
/// The idea is to keep service-specific wire types next to their
/// client and build them `From` these.
#[derive(Debug, Clone, Default)]
pub struct Message {
    pub from: Option<AddressSpec>,
    pub to: Option<Addresses>,
    pub cc: Option<Addresses>,
    pub bcc: Option<Addresses>,
    pub reply_to: Option<Addresses>,
    pub subject: Option<String>,
    pub text: Option<String>,
    pub html: Option<String>,
    pub attachments: Option<Vec<Attachment>>,
}

impl Message {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn from(mut self, from: impl Into<AddressSpec>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn to(mut self, to: impl Into<Addresses>) -> Self {
        self.to = Some(to.into());
        self
    }

    pub fn cc(mut self, cc: impl Into<Addresses>) -> Self {
        self.cc = Some(cc.into());
        self
    }

    pub fn bcc(mut self, bcc: impl Into<Addresses>) -> Self {
        self.bcc = Some(bcc.into());
        self
    }

    pub fn reply_to(mut self, reply_to: impl Into<Addresses>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.attachments
            .get_or_insert_with(Vec::new)
            .push(attachment);
        self
    }
}

/// A structured address. `name` is an optional display name; when it
/// matches `address` it carries no information and is dropped during
/// normalization.
#[derive(Debug, Clone)]
pub struct Address {
    pub address: String,
    pub name: Option<String>,
}

impl Address {
    pub fn new(address: impl Into<String>, name: Option<&str>) -> Self {
        Self {
            address: address.into(),
            name: name.map(|n| n.to_string()),
        }
    }
}

/// One address input: a display string (which may wrap a name in
/// angle brackets) or a structured address.
#[derive(Debug, Clone)]
pub enum AddressSpec {
    Text(String),
    Parts(Address),
}

impl From<&str> for AddressSpec {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for AddressSpec {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Address> for AddressSpec {
    fn from(addr: Address) -> Self {
        Self::Parts(addr)
    }
}

/// An address field value: a single input or a list of them.
/// Lists keep their order and are never deduplicated.
#[derive(Debug, Clone)]
pub enum Addresses {
    One(AddressSpec),
    Many(Vec<AddressSpec>),
}

impl From<&str> for Addresses {
    fn from(s: &str) -> Self {
        Self::One(s.into())
    }
}

impl From<String> for Addresses {
    fn from(s: String) -> Self {
        Self::One(s.into())
    }
}

impl From<Address> for Addresses {
    fn from(addr: Address) -> Self {
        Self::One(addr.into())
    }
}

impl From<AddressSpec> for Addresses {
    fn from(spec: AddressSpec) -> Self {
        Self::One(spec)
    }
}

impl From<Vec<AddressSpec>> for Addresses {
    fn from(list: Vec<AddressSpec>) -> Self {
        Self::Many(list)
    }
}

/// A single attachment as supplied by the caller. Both fields are
/// required to send; they are optional here so that validation can
/// report the gap instead of the type system rejecting the request.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub filename: Option<String>,
    pub content: Option<AttachmentContent>,
}

impl Attachment {
    pub fn new(filename: impl Into<String>, content: impl Into<AttachmentContent>) -> Self {
        Self {
            filename: Some(filename.into()),
            content: Some(content.into()),
        }
    }
}

/// Attachment content, textual or raw bytes. Text is converted to
/// bytes at assembly time; bytes pass through unchanged.
#[derive(Debug, Clone)]
pub enum AttachmentContent {
    Text(String),
    Binary(Vec<u8>),
}

impl AttachmentContent {
    pub fn as_bytes(&self) -> &[u8] {
        match *self {
            AttachmentContent::Text(ref s) => s.as_bytes(),
            AttachmentContent::Binary(ref b) => b,
        }
    }
}

impl From<&str> for AttachmentContent {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for AttachmentContent {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<u8>> for AttachmentContent {
    fn from(b: Vec<u8>) -> Self {
        Self::Binary(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_collects_attachments() {
        let msg = Message::new()
            .to("a@example.com")
            .attachment(Attachment::new("one.txt", "1"))
            .attachment(Attachment::new("two.txt", "2"));

        let attachments = msg.attachments.unwrap();
        assert_eq!(attachments.len(), 2);
        assert_eq!(attachments[0].filename.as_deref(), Some("one.txt"));
        assert_eq!(attachments[1].filename.as_deref(), Some("two.txt"));
    }

    #[test]
    fn test_address_conversions() {
        match Addresses::from("a@example.com") {
            Addresses::One(AddressSpec::Text(s)) => assert_eq!(s, "a@example.com"),
            other => panic!("unexpected variant: {:?}", other),
        }

        match Addresses::from(Address::new("a@example.com", Some("A"))) {
            Addresses::One(AddressSpec::Parts(a)) => {
                assert_eq!(a.address, "a@example.com");
                assert_eq!(a.name.as_deref(), Some("A"));
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }
}
