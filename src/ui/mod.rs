/// Presentation layer
///
/// Thin views over the editing session. All state changes go through
/// `Message`s handled in `main.rs`.

pub mod editor;
pub mod quick;
pub mod tags;

use iced::widget::{container, text};
use iced::{Color, Element, Length};

use crate::state::data::Counter;
use crate::Message;

const OVER_LIMIT: Color = Color::from_rgb(0.9, 0.3, 0.3);
const ERROR_BACKGROUND: Color = Color::from_rgb(0.35, 0.1, 0.1);

/// `current/max`, red when over the limit
pub fn counter_label<'a>(counter: Counter) -> Element<'a, Message> {
    let label = text(counter.to_string()).size(13);
    if counter.over_limit() {
        label.color(OVER_LIMIT).into()
    } else {
        label.into()
    }
}

/// The single error banner; the latest message replaces any earlier one
pub fn banner<'a>(message: &'a str) -> Element<'a, Message> {
    container(text(message).color(Color::WHITE))
        .padding(10)
        .width(Length::Fill)
        .style(|_theme| container::Style {
            background: Some(ERROR_BACKGROUND.into()),
            ..container::Style::default()
        })
        .into()
}
