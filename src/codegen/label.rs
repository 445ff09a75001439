// Monotonic label counters. Jump labels are `.L<n>` from 0; string-literal
// data labels are `.str<n>` from 1.

#[derive(Debug, Default)]
pub struct LabelAllocator {
    next_jump: usize,
    next_string: usize,
}

impl LabelAllocator {
    pub fn new() -> Self {
        Self {
            next_jump: 0,
            next_string: 1,
        }
    }

    pub fn jump_label(&mut self) -> String {
        let label = format!(".L{}", self.next_jump);
        self.next_jump += 1;
        return label;
    }

    pub fn string_label(&mut self) -> String {
        let label = format!(".str{}", self.next_string);
        self.next_string += 1;
        return label;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jump_labels_count_from_zero() {
        let mut labels = LabelAllocator::new();
        assert_eq!(labels.jump_label(), ".L0");
        assert_eq!(labels.jump_label(), ".L1");
    }

    #[test]
    fn string_labels_count_from_one_independently() {
        let mut labels = LabelAllocator::new();
        labels.jump_label();
        assert_eq!(labels.string_label(), ".str1");
        assert_eq!(labels.string_label(), ".str2");
        assert_eq!(labels.jump_label(), ".L1");
    }
}
