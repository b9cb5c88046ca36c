use ratatui::widgets::ScrollbarState;

#[derive(Default)]
pub struct Scroll {
    pub position: u16,
    pub scrollbar_state: ScrollbarState,
    content_length: usize,
    viewport_length: usize,
}

impl Scroll {
    pub fn set_state(&mut self, content_length: usize, viewport_length: usize) {
        self.content_length = content_length;
        self.viewport_length = viewport_length;

        let max = self.max_position();
        if usize::from(self.position) > max {
            self.position = clamp_to_u16(max);
        }

        self.scrollbar_state = ScrollbarState::new(max).position(self.position.into());
    }

    fn max_position(&self) -> usize {
        return self.content_length.saturating_sub(self.viewport_length);
    }

    pub fn up(&mut self) {
        self.position = self.position.saturating_sub(1);
        self.sync();
    }

    pub fn down(&mut self) {
        let max = clamp_to_u16(self.max_position());
        if self.position < max {
            self.position += 1;
        }
        self.sync();
    }

    pub fn up_page(&mut self) {
        self.position = self.position.saturating_sub(clamp_to_u16(self.viewport_length));
        self.sync();
    }

    pub fn down_page(&mut self) {
        let target = usize::from(self.position)
            .saturating_add(self.viewport_length)
            .min(self.max_position());
        self.position = clamp_to_u16(target);
        self.sync();
    }

    pub fn last(&mut self) {
        self.position = clamp_to_u16(self.max_position());
        self.sync();
    }

    pub fn is_position_at_last(&self) -> bool {
        return usize::from(self.position) >= self.max_position();
    }

    fn sync(&mut self) {
        self.scrollbar_state = ScrollbarState::new(self.max_position()).position(self.position.into());
    }
}

// The render offset is a u16; anything past that saturates instead of wrapping.
fn clamp_to_u16(value: usize) -> u16 {
    return u16::try_from(value).unwrap_or(u16::MAX);
}
