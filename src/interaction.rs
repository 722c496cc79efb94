/// Ctrl-C, which raw mode delivers as a plain byte.
const INTERRUPT: u8 = 0x03;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Move(i64, i64),
    Flag,
    Open,
    Quit
}

pub fn action_from_byte(byte: u8) -> Option<Action> {
    match byte {
        b'w' => Some(Action::Move(-1, 0)),
        b'a' => Some(Action::Move(0, -1)),
        b's' => Some(Action::Move(1, 0)),
        b'd' => Some(Action::Move(0, 1)),
        b'f' => Some(Action::Flag),
        b' ' => Some(Action::Open),
        b'q' | INTERRUPT => Some(Action::Quit),
        _ => None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn movement_keys() {
        assert_eq!(action_from_byte(b'w'), Some(Action::Move(-1, 0)));
        assert_eq!(action_from_byte(b'a'), Some(Action::Move(0, -1)));
        assert_eq!(action_from_byte(b's'), Some(Action::Move(1, 0)));
        assert_eq!(action_from_byte(b'd'), Some(Action::Move(0, 1)));
    }

    #[test]
    fn action_keys() {
        assert_eq!(action_from_byte(b' '), Some(Action::Open));
        assert_eq!(action_from_byte(b'f'), Some(Action::Flag));
        assert_eq!(action_from_byte(b'q'), Some(Action::Quit));
        assert_eq!(action_from_byte(0x03), Some(Action::Quit));
    }

    #[test]
    fn arrow_key_sequences_are_ignored() {
        // ESC [ A .. ESC [ D
        for byte in b"\x1b[ABCD".iter() {
            assert_eq!(action_from_byte(*byte), None);
        }
    }

    proptest! {
        #[test]
        fn unmapped_bytes_are_ignored(byte in any::<u8>()) {
            let mapped = b"wasdf q\x03".contains(&byte);
            prop_assert_eq!(action_from_byte(byte).is_some(), mapped);
        }
    }
}
