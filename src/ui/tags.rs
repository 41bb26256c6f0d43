/// Tag chips and the tag input row
use iced::widget::{button, column, row, text, text_input};
use iced::{Element, Length};
use iced_aw::Wrap;

use super::counter_label;
use crate::state::data::Counter;
use crate::Message;

pub fn view<'a>(tags: &'a [String], pending: &str, counter: Counter) -> Element<'a, Message> {
    // Clicking a chip removes it
    let chips: Vec<Element<'a, Message>> = tags
        .iter()
        .enumerate()
        .map(|(index, tag)| {
            button(text(format!("{}  ✕", tag)).size(14))
                .on_press(Message::RemoveTag(index))
                .padding([4, 10])
                .style(button::secondary)
                .into()
        })
        .collect();

    let input = text_input("Press Space or Enter to add a tag", pending)
        .on_input(Message::TagInputChanged)
        .on_submit(Message::TagInputSubmitted)
        .padding(8)
        .width(Length::Fill);

    column![
        row![text("Tags").size(16).width(Length::Fill), counter_label(counter)],
        Wrap::with_elements(chips).spacing(6.0).line_spacing(6.0),
        input,
    ]
    .spacing(8)
    .into()
}
