use super::Author;
use super::Message;
use super::MessageType;

#[test]
fn it_creates_a_normal_message() {
    let message = Message::new(Author::User, "Hi");
    assert_eq!(message.author, Author::User);
    assert_eq!(message.text, "Hi");
    assert_eq!(message.message_type(), MessageType::Normal);
}

#[test]
fn it_creates_an_error_message() {
    let message = Message::new_with_type(Author::Parley, MessageType::Error, "boom");
    assert_eq!(message.message_type(), MessageType::Error);
}

#[test]
fn it_replaces_tabs() {
    let message = Message::new(Author::Assistant, "a\tb");
    assert_eq!(message.text, "a  b");
}
