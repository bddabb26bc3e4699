use iced::widget::{button, container, text, Row};
use iced::{Element, Length};

use crate::navigation::Tab;

/// One button per tab, the active one highlighted
pub fn tab_bar<'a, M>(active: Tab, on_select: impl Fn(Tab) -> M) -> Element<'a, M>
where
    M: Clone + 'a,
{
    let buttons = Tab::ALL.into_iter().map(|tab| {
        let style = if tab == active {
            button::primary
        } else {
            button::text
        };
        button(text(tab.title()).size(15))
            .on_press(on_select(tab))
            .style(style)
            .padding(12)
            .width(Length::Fill)
            .into()
    });

    container(Row::with_children(buttons).spacing(4))
        .padding(6)
        .width(Length::Fill)
        .style(container::rounded_box)
        .into()
}
