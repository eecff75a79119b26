//! Fixed catalog of debate topics.

/// One selectable debate topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebateTopic {
    pub title: &'static str,
    pub description: &'static str,
    pub opening_prompt: &'static str,
}

pub const OPEN_ENDED_TITLE: &str = "Open-Ended Discussion";

const CATALOG: &[DebateTopic] = &[
    DebateTopic {
        title: "Social Media and Democracy",
        description: "Do social platforms strengthen or erode democratic debate?",
        opening_prompt: "Social media has given everyone a megaphone, but has it made our democracies healthier or more fragile? Tell me where you stand and I'll argue the other side.",
    },
    DebateTopic {
        title: "Universal Basic Income",
        description: "Should every citizen receive an unconditional income?",
        opening_prompt: "Imagine every adult received a monthly payment with no strings attached. Is universal basic income a safety net for the future of work or an unaffordable experiment? Make your case.",
    },
    DebateTopic {
        title: "Artificial Intelligence and Jobs",
        description: "Will AI create more work than it destroys?",
        opening_prompt: "Automation keeps moving into skilled work. Do you think AI will leave us with better jobs or fewer of them? Give me your position and your best evidence.",
    },
    DebateTopic {
        title: "Nuclear Energy",
        description: "Is nuclear power essential to a low-carbon future?",
        opening_prompt: "Nuclear power is low-carbon and reliable, yet it still worries many people. Should we build more reactors? Tell me what you think and why.",
    },
    DebateTopic {
        title: "Space Exploration Funding",
        description: "Is public money for space programs well spent?",
        opening_prompt: "Every dollar spent on rockets is a dollar not spent on Earth, or so the argument goes. Is funding space exploration worth it? Pick a side.",
    },
    DebateTopic {
        title: "Remote Work",
        description: "Should remote work become the default for office jobs?",
        opening_prompt: "Offices emptied out and many teams never came back. Is remote work better for people and companies, or are we losing something important? Where do you stand?",
    },
    DebateTopic {
        title: OPEN_ENDED_TITLE,
        description: "Bring any claim you like and defend it.",
        opening_prompt: "Pick any claim you believe, big or small, and state it plainly. I'll push back as hard as I can, and you defend it.",
    },
];

/// All topics in display order.
#[must_use]
pub fn catalog() -> &'static [DebateTopic] {
    CATALOG
}

/// Looks up a topic by exact title, ignoring ASCII case and surrounding whitespace.
#[must_use]
pub fn find_by_title(title: &str) -> Option<&'static DebateTopic> {
    let wanted = title.trim();
    CATALOG
        .iter()
        .find(|topic| topic.title.eq_ignore_ascii_case(wanted))
}

/// Looks up a topic by its 1-based position in the catalog.
#[must_use]
pub fn find_by_number(number: usize) -> Option<&'static DebateTopic> {
    number.checked_sub(1).and_then(|index| CATALOG.get(index))
}

/// Resolves a picker choice: a 1-based number or a title.
#[must_use]
pub fn resolve_choice(choice: &str) -> Option<&'static DebateTopic> {
    let choice = choice.trim();
    match choice.parse::<usize>() {
        Ok(number) => find_by_number(number),
        Err(_) => find_by_title(choice),
    }
}
