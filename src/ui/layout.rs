use tui::layout::{Constraint, Layout, Rect, Size};
pub const TAB_BAR_HEIGHT: u16 = 3;
pub const STATUS_BAR_HEIGHT: u16 = 1;
pub const LOG_PANE_HEIGHT: u16 = 10;

/// Pre-computed layout areas for the main draw loop.
pub struct LayoutAreas {
    pub tab_bar: [Rect; 2],
    pub main: Rect,
    pub logs: Option<Rect>,
    pub status: Rect,
}

impl LayoutAreas {
    pub fn new(size: Size) -> Self {
        let rect = Rect::new(0, 0, size.width, size.height);
        Self::from_rect(rect, false, false)
    }

    pub fn update(&mut self, area: Rect, full_screen: bool, show_logs: bool) {
        *self = Self::from_rect(area, full_screen, show_logs);
    }

    fn from_rect(area: Rect, full_screen: bool, show_logs: bool) -> Self {
        let [body, status] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(STATUS_BAR_HEIGHT)])
                .areas(area);

        let (tab_bar, content) = if full_screen {
            ([Rect::ZERO, Rect::ZERO], body)
        } else {
            let [tab, content] =
                Layout::vertical([Constraint::Length(TAB_BAR_HEIGHT), Constraint::Fill(1)])
                    .areas(body);
            (Self::split_tab_bar(tab), content)
        };

        let (main, logs) = if show_logs && content.height > LOG_PANE_HEIGHT * 2 {
            let [main, logs] =
                Layout::vertical([Constraint::Fill(1), Constraint::Length(LOG_PANE_HEIGHT)])
                    .areas(content);
            (main, Some(logs))
        } else {
            (content, None)
        };

        LayoutAreas { tab_bar, main, logs, status }
    }

    fn split_tab_bar(area: Rect) -> [Rect; 2] {
        Layout::horizontal([Constraint::Percentage(85), Constraint::Percentage(15)]).areas(area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_bar_always_takes_last_line() {
        let layout = LayoutAreas::new(Size::new(80, 24));
        assert_eq!(layout.status, Rect::new(0, 23, 80, 1));
        assert_eq!(layout.main.y, TAB_BAR_HEIGHT);
        assert!(layout.logs.is_none());
    }

    #[test]
    fn full_screen_hides_tab_bar() {
        let mut layout = LayoutAreas::new(Size::new(80, 24));
        layout.update(Rect::new(0, 0, 80, 24), true, false);
        assert_eq!(layout.tab_bar, [Rect::ZERO, Rect::ZERO]);
        assert_eq!(layout.main, Rect::new(0, 0, 80, 23));
    }

    #[test]
    fn log_pane_only_when_there_is_room() {
        let mut layout = LayoutAreas::new(Size::new(80, 40));
        layout.update(Rect::new(0, 0, 80, 40), false, true);
        assert_eq!(layout.logs.map(|r| r.height), Some(LOG_PANE_HEIGHT));

        layout.update(Rect::new(0, 0, 80, 20), false, true);
        assert!(layout.logs.is_none());
    }
}
