//! Signal label colouring

use ratatui::style::{Color, Modifier, Style};
use signal_board::SignalState;

/// Tone of a signal label, decided by keyword. Labels are free-form, so matching is loose and
/// checked strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalTone {
    StrongBuy,
    Buy,
    Short,
    Sell,
}

impl SignalTone {
    pub fn classify(label: &str) -> Option<Self> {
        let lower = label.to_lowercase();

        if label.contains("強力買進") || (lower.contains("strong") && lower.contains("buy")) {
            Some(Self::StrongBuy)
        } else if label.contains("狙擊做空") || lower.contains("short") {
            Some(Self::Short)
        } else if label.contains("賣出") || lower.contains("sell") {
            Some(Self::Sell)
        } else if label.contains("買進") || lower.contains("buy") {
            Some(Self::Buy)
        } else {
            None
        }
    }

    pub fn background(&self) -> Color {
        match self {
            SignalTone::StrongBuy => Color::Rgb(0x29, 0x62, 0xFF),
            SignalTone::Buy => Color::Rgb(0x00, 0x4D, 0x40),
            SignalTone::Short => Color::Rgb(0x80, 0x00, 0x00),
            SignalTone::Sell => Color::Rgb(0xD3, 0x2F, 0x2F),
        }
    }

    pub fn style(&self) -> Style {
        Style::default()
            .bg(self.background())
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }
}

/// Cell style for a stored signal; unknown labels and the no-signal state are unstyled.
pub fn signal_style(state: &SignalState) -> Style {
    match state {
        SignalState::Active(label) => SignalTone::classify(label)
            .map(|tone| tone.style())
            .unwrap_or_default(),
        SignalState::NoSignal => Style::default().fg(Color::DarkGray),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        struct TestCase {
            input: &'static str,
            expected: Option<SignalTone>,
        }

        let tests = vec![
            TestCase {
                // TC0: strong buy keyword
                input: "Strong-Buy",
                expected: Some(SignalTone::StrongBuy),
            },
            TestCase {
                // TC1: strong buy, native label
                input: "強力買進",
                expected: Some(SignalTone::StrongBuy),
            },
            TestCase {
                // TC2: partial buy
                input: "買進40%",
                expected: Some(SignalTone::Buy),
            },
            TestCase {
                // TC3: plain buy
                input: "buy",
                expected: Some(SignalTone::Buy),
            },
            TestCase {
                // TC4: short
                input: "狙擊做空",
                expected: Some(SignalTone::Short),
            },
            TestCase {
                // TC5: sell
                input: "賣出40%",
                expected: Some(SignalTone::Sell),
            },
            TestCase {
                // TC6: sell keyword, any case
                input: "SELL 40%",
                expected: Some(SignalTone::Sell),
            },
            TestCase {
                // TC7: unknown label
                input: "neutral",
                expected: None,
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let actual = SignalTone::classify(test.input);
            assert_eq!(actual, test.expected, "TC{} failed", index);
        }
    }

    #[test]
    fn test_signal_style() {
        let strong = signal_style(&SignalState::Active("strong-buy".into()));
        assert_eq!(strong.bg, Some(Color::Rgb(0x29, 0x62, 0xFF)));

        let unknown = signal_style(&SignalState::Active("neutral".into()));
        assert_eq!(unknown, Style::default());

        let none = signal_style(&SignalState::NoSignal);
        assert_eq!(none.bg, None);
    }
}
