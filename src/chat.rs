use serde::{Deserialize, Serialize};

const HOUR_MS: f64 = 60.0 * 60.0 * 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Author {
    Me,
    Pet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub author: Author,
    pub text: String,
    /// Milliseconds since the Unix epoch.
    pub sent_at: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    pub pet_id: String,
    pub pet_name: String,
    pub owner_name: String,
    pub image: String,
    pub last_message: String,
    pub time_label: String,
    pub unread: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Thread {
    pub pet_id: String,
    messages: Vec<ChatMessage>,
    sent: u32,
}

impl Thread {
    pub fn new(pet_id: &str, messages: Vec<ChatMessage>) -> Self {
        Self {
            pet_id: pet_id.to_string(),
            messages,
            sent: 0,
        }
    }

    /// Opening line the pet greets with, sent `hours_ago` before `now`.
    pub fn opened_by_pet(pet_id: &str, greeting: &str, hours_ago: f64, now: f64) -> Self {
        Self::new(
            pet_id,
            vec![ChatMessage {
                id: "1".to_string(),
                author: Author::Pet,
                text: greeting.to_string(),
                sent_at: now - hours_ago * HOUR_MS,
            }],
        )
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Appends a message from the user. Blank input is ignored.
    pub fn send(&mut self, text: &str, now: f64) -> Option<&ChatMessage> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        self.sent += 1;
        self.messages.push(ChatMessage {
            id: format!("{}-{}", now as u64, self.sent),
            author: Author::Me,
            text: text.to_string(),
            sent_at: now,
        });
        self.messages.last()
    }
}

pub fn sample_conversations() -> Vec<Conversation> {
    let row = |pet_id: &str, pet: &str, owner: &str, image: &str, last: &str, time: &str, unread| {
        Conversation {
            pet_id: pet_id.to_string(),
            pet_name: pet.to_string(),
            owner_name: owner.to_string(),
            image: image.to_string(),
            last_message: last.to_string(),
            time_label: time.to_string(),
            unread,
        }
    };
    vec![
        row(
            "1",
            "Bella",
            "Sarah",
            "https://images.unsplash.com/photo-1552053831-71594a27632d?auto=format&fit=crop&w=800&q=80",
            "Let's meet at the park this weekend!",
            "10:32 AM",
            2,
        ),
        row(
            "2",
            "Max",
            "Mike",
            "https://images.unsplash.com/photo-1560743641-3914f2c45636?auto=format&fit=crop&w=800&q=80",
            "My dog really enjoyed playing with yours! We should do it again.",
            "Yesterday",
            0,
        ),
        row(
            "3",
            "Luna",
            "Emma",
            "https://images.unsplash.com/photo-1511382686815-a9a670f0a512?auto=format&fit=crop&w=800&q=80",
            "Thanks for the recommendation on the vet!",
            "Wed",
            0,
        ),
    ]
}

/// Starting thread for a sample conversation, if the pet is known.
pub fn sample_thread(pet_id: &str, now: f64) -> Option<Thread> {
    let (greeting, hours_ago) = match pet_id {
        "1" => ("Hi there! Would you like to go for a walk with me?", 24.0),
        "2" => ("Do you like playing ball? Fetch is my favourite!", 12.0),
        "3" => ("Hello! I'm full of energy. Let's run around together!", 6.0),
        _ => return None,
    };
    Some(Thread::opened_by_pet(pet_id, greeting, hours_ago, now))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_messages_are_not_sent() {
        let mut thread = Thread::new("1", Vec::new());
        assert!(thread.send("   ", 1000.0).is_none());
        assert!(thread.messages().is_empty());
    }

    #[test]
    fn sent_message_is_trimmed_and_appended() {
        let mut thread = sample_thread("2", 50.0 * HOUR_MS).unwrap();
        let sent = thread.send("  see you at noon ", 50.0 * HOUR_MS).cloned().unwrap();
        assert_eq!(sent.text, "see you at noon");
        assert_eq!(sent.author, Author::Me);
        assert_eq!(thread.messages().len(), 2);
        assert_eq!(thread.messages()[0].sent_at, 38.0 * HOUR_MS);
    }

    #[test]
    fn messages_in_the_same_millisecond_get_distinct_ids() {
        let mut thread = Thread::new("1", Vec::new());
        let first = thread.send("hi", 1000.0).map(|m| m.id.clone());
        let second = thread.send("again", 1000.0).map(|m| m.id.clone());
        assert!(first.is_some());
        assert_ne!(first, second);
    }

    #[test]
    fn unknown_pet_has_no_thread() {
        assert!(sample_thread("99", 0.0).is_none());
        assert_eq!(sample_conversations().len(), 3);
    }
}
