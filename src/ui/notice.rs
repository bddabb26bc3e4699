//! Notices waiting to be acknowledged, and the dialog that shows them.
//!
//! Only the oldest notice is on screen; dismissing it reveals the next one.
//! While a notice is up the screen underneath receives no input.

use std::collections::VecDeque;

use iced::widget::{button, center, column, container, opaque, stack, text};
use iced::{Color, Element, Length};

use crate::state::Notice;

#[derive(Debug, Default)]
pub struct Notices {
    queue: VecDeque<Notice>,
}

impl Notices {
    pub fn push(&mut self, notice: Notice) {
        if notice.is_error() {
            tracing::debug!(title = %notice.title, body = %notice.body, "error notice queued");
        }
        self.queue.push_back(notice);
    }

    /// The notice on screen, if any
    pub fn current(&self) -> Option<&Notice> {
        self.queue.front()
    }

    pub fn dismiss(&mut self) {
        self.queue.pop_front();
    }
}

/// Draw `base`, with the current notice (if any) on top of it
pub fn overlay<'a, M>(base: Element<'a, M>, notices: &'a Notices, on_dismiss: M) -> Element<'a, M>
where
    M: Clone + 'a,
{
    let Some(notice) = notices.current() else {
        return base;
    };

    let title = if notice.is_error() {
        text(&notice.title).size(20).style(text::danger)
    } else {
        text(&notice.title).size(20).style(text::success)
    };

    let dialog = container(
        column![
            title,
            text(&notice.body),
            button("OK").on_press(on_dismiss).padding([6, 24]),
        ]
        .spacing(14),
    )
    .padding(20)
    .max_width(360)
    .style(container::rounded_box);

    let backdrop = center(opaque(dialog))
        .width(Length::Fill)
        .height(Length::Fill)
        .style(|_theme| container::Style {
            background: Some(
                Color {
                    a: 0.7,
                    ..Color::BLACK
                }
                .into(),
            ),
            ..container::Style::default()
        });

    stack![base, opaque(backdrop)].into()
}
