//! Outbound "send message to member" seam.

use log::info;

/// Who a message is addressed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecipient {
    pub name: String,
    pub email: String,
}

impl MessageRecipient {
    /// `mailto:` link an external mail client can open.
    pub fn mailto_link(&self) -> String {
        format!("mailto:{}", self.email.trim())
    }
}

/// Fire-and-forget message dispatch.
pub trait Notifier {
    fn send_message(&self, recipient: &MessageRecipient);
}

impl<F: Fn(&MessageRecipient)> Notifier for F {
    fn send_message(&self, recipient: &MessageRecipient) {
        self(recipient)
    }
}

/// Notifier that only records the hand-off in the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send_message(&self, _recipient: &MessageRecipient) {
        info!("event=send_message module=notifier status=dispatched channel=mailto");
    }
}

#[cfg(test)]
mod tests {
    use super::{MessageRecipient, Notifier};
    use std::cell::RefCell;

    #[test]
    fn closures_act_as_notifiers() {
        let sent = RefCell::new(Vec::new());
        let notifier = |recipient: &MessageRecipient| sent.borrow_mut().push(recipient.mailto_link());

        notifier.send_message(&MessageRecipient {
            name: "Mike Chen".to_string(),
            email: " mike.chen@company.com ".to_string(),
        });

        assert_eq!(sent.into_inner(), vec!["mailto:mike.chen@company.com"]);
    }
}
