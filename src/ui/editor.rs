/// Advanced editor view
use iced::widget::{button, column, container, image, pick_list, row, text, text_input, Column};
use iced::{Alignment, ContentFit, Element, Length};

use super::{counter_label, tags};
use crate::preview::host::IcedPreviewHost;
use crate::preview::lifecycle::FitMode;
use crate::state::data::{Counter, Field, MAX_TAGS};
use crate::state::session::EditorSession;
use crate::submit::Resize;
use crate::Message;

/// Height of the square preview frame
const PREVIEW_HEIGHT: f32 = 320.0;

pub fn view<'a>(
    session: &'a EditorSession<IcedPreviewHost>,
    resize: Resize,
    busy: bool,
) -> Element<'a, Message> {
    let source_label = session
        .source()
        .map(|f| f.name.as_str())
        .unwrap_or("No file selected");

    let picker = row![
        button("Choose .pose file").on_press(Message::ChoosePose).padding(10),
        button("Clear").on_press(Message::ClearPose).padding(10),
        text(source_label).size(14),
    ]
    .spacing(12)
    .align_y(Alignment::Center);

    let mut content: Column<Message> = column![picker].spacing(18);

    if session.is_loaded() {
        content = content
            .push(field_input(
                session,
                Field::Author,
                "Author name (max 50)",
                session.author(),
                Message::AuthorChanged,
            ))
            .push(field_input(
                session,
                Field::Description,
                "Description (max 160)",
                session.description(),
                Message::DescriptionChanged,
            ))
            .push(field_input(
                session,
                Field::Version,
                "Version (max 10)",
                session.version(),
                Message::VersionChanged,
            ))
            .push(tags::view(
                session.tags(),
                session.tag_input(),
                session.counter(Field::Tags).unwrap_or(Counter::new(0, MAX_TAGS)),
            ))
            .push(preview(session))
            .push(
                row![
                    text("Resize image").size(16),
                    pick_list(Resize::ALL, Some(resize), Message::ResizeSelected),
                ]
                .spacing(12)
                .align_y(Alignment::Center),
            )
            .push(
                row![
                    button(if busy { "Creating..." } else { "Create" })
                        .on_press_maybe((!busy).then_some(Message::Create))
                        .padding(10),
                    button("Start over")
                        .on_press(Message::StartOver)
                        .padding(10)
                        .style(button::secondary),
                ]
                .spacing(12),
            );
    }

    content.into()
}

fn field_input<'a>(
    session: &EditorSession<IcedPreviewHost>,
    field: Field,
    placeholder: &'a str,
    value: &'a str,
    on_input: fn(String) -> Message,
) -> Element<'a, Message> {
    let header = match session.counter(field) {
        Some(counter) => row![text(field.key()).size(16).width(Length::Fill), counter_label(counter)],
        None => row![text(field.key()).size(16)],
    };

    column![header, text_input(placeholder, value).on_input(on_input).padding(8)]
        .spacing(6)
        .into()
}

fn preview<'a>(session: &'a EditorSession<IcedPreviewHost>) -> Element<'a, Message> {
    let manager = session.image();

    let frame: Element<'a, Message> = match manager.displayed() {
        Some(handle) => {
            let fit = match manager.fit() {
                FitMode::Fill => ContentFit::Cover,
                FitMode::Contain => ContentFit::Contain,
            };
            image(handle.clone())
                .content_fit(fit)
                .width(Length::Fill)
                .height(Length::Fixed(PREVIEW_HEIGHT))
                .into()
        }
        None => container(text("No image").size(14))
            .center_x(Length::Fill)
            .center_y(Length::Fixed(PREVIEW_HEIGHT))
            .into(),
    };

    let staged_label = session
        .staged_image()
        .map(|s| format!("Replacement: {}", s.name))
        .unwrap_or_default();

    column![
        text("Image").size(16),
        container(frame).max_width(manager.preview_width()),
        row![
            button("Replace image").on_press(Message::ChooseImage).padding(8),
            button("Clear image")
                .on_press(Message::ClearImage)
                .padding(8)
                .style(button::secondary),
            text(staged_label).size(14),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
    ]
    .spacing(8)
    .into()
}
