/// Quick image swap view
use iced::widget::{button, column, row, text, text_input};
use iced::{Alignment, Element, Length};

use crate::submit::quick::QuickSwap;
use crate::Message;

const NO_FILE: &str = "No file selected";

pub fn view<'a>(swap: &'a QuickSwap, busy: bool) -> Element<'a, Message> {
    let pose_label = swap
        .pose_file
        .as_ref()
        .map(|f| f.name.as_str())
        .unwrap_or(NO_FILE);
    let image_label = swap
        .image_file
        .as_ref()
        .map(|f| f.name.as_str())
        .unwrap_or(NO_FILE);

    column![
        text("Pose file").size(16),
        row![
            button("Choose .pose file").on_press(Message::QuickChoosePose).padding(8),
            text(pose_label).size(14),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
        text_input("...or a pose file URL", &swap.pose_url)
            .on_input(Message::QuickPoseUrlChanged)
            .padding(8)
            .width(Length::Fill),
        text("Image").size(16),
        row![
            button("Choose image").on_press(Message::QuickChooseImage).padding(8),
            text(image_label).size(14),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
        text_input("...or an image URL", &swap.image_url)
            .on_input(Message::QuickImageUrlChanged)
            .padding(8)
            .width(Length::Fill),
        button(if busy { "Creating..." } else { "Create" })
            .on_press_maybe((!busy).then_some(Message::QuickSubmit))
            .padding(10),
    ]
    .spacing(12)
    .into()
}
