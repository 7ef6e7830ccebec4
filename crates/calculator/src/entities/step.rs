use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Step {
    Delivery = 0,
    Cargo = 1,
    Services = 2,
    Contact = 3,
}

impl Step {
    pub const ALL: [Step; 4] = [Step::Delivery, Step::Cargo, Step::Services, Step::Contact];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Step> {
        Self::ALL.get(index).copied()
    }

    pub fn next(self) -> Option<Step> {
        Self::from_index(self.index() + 1)
    }

    pub fn previous(self) -> Option<Step> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub fn is_last(self) -> bool {
        self.next().is_none()
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Delivery => "Выбор склада",
            Step::Cargo => "Тип груза",
            Step::Services => "Доп. услуги",
            Step::Contact => "Данные клиента",
        }
    }
}

impl Display for Step {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{} {}", self.index() + 1, Self::ALL.len(), self.title())
    }
}
