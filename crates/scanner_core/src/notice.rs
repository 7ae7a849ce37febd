#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

/// Where a notice is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// Banner above the analysis form.
    Submission,
    /// Banner inside the recipient settings panel.
    Settings,
}

/// One slot per surface; a new notice replaces the previous one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Notifications {
    submission: Option<Notice>,
    settings: Option<Notice>,
}

impl Notifications {
    pub fn post(&mut self, surface: Surface, notice: Notice) {
        *self.slot_mut(surface) = Some(notice);
    }

    pub fn clear(&mut self, surface: Surface) {
        *self.slot_mut(surface) = None;
    }

    pub fn get(&self, surface: Surface) -> Option<&Notice> {
        match surface {
            Surface::Submission => self.submission.as_ref(),
            Surface::Settings => self.settings.as_ref(),
        }
    }

    fn slot_mut(&mut self, surface: Surface) -> &mut Option<Notice> {
        match surface {
            Surface::Submission => &mut self.submission,
            Surface::Settings => &mut self.settings,
        }
    }
}
