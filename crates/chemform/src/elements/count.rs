use std::{
    fmt::{self, Display, Formatter},
    num::NonZeroU32,
};

use crate::Count;

impl Count {
    #[must_use]
    pub const fn new(n: u32) -> Option<Self> {
        // NOTE: `Option::map` isn't `const` yet, hence the `match`
        match NonZeroU32::new(n) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl Display for Count {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for Count {
    fn default() -> Self {
        Self(NonZeroU32::MIN)
    }
}

impl From<Count> for u64 {
    fn from(value: Count) -> Self {
        value.0.get().into()
    }
}
