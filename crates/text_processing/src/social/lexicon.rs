//! Word lists and default reply pools for social messages

pub(super) const GREETINGS: &[&str] = &[
    "hi",
    "hello",
    "hey",
    "greetings",
    "good morning",
    "good afternoon",
    "good evening",
    "howdy",
    "hi there",
    "hello there",
    "hey there",
    "whats up",
    "what's up",
    "sup",
    "yo",
];

pub(super) const THANKS: &[&str] = &[
    "thank",
    "thanks",
    "thank you",
    "thx",
    "thanx",
    "appreciate",
    "appreciated",
    "grateful",
    "awesome",
    "great",
    "perfect",
    "nice",
    "helpful",
    "you helped",
    "you're helpful",
];

pub(super) const GOODBYES: &[&str] = &[
    "bye",
    "goodbye",
    "good bye",
    "see you",
    "see ya",
    "later",
    "catch you later",
    "gotta go",
    "have a good",
    "take care",
];

pub(super) const AFFIRMATIVES: &[&str] = &["yes", "yeah", "yep", "yup", "sure", "ok", "okay", "alright"];

pub(super) const HOW_ARE_YOU: &[&str] = &[
    "how are you",
    "how r u",
    "hows it going",
    "how's it going",
    "how are things",
    "you doing ok",
    "are you ok",
    "you good",
];

// Arabic keywords: single words match at the start of a token (optionally
// after the conjunction و), phrases match as substrings.

pub(super) const AR_GREETINGS: &[&str] = &["مرحبا", "السلام عليكم", "أهلا", "اهلا", "هاي", "صباح الخير", "مساء الخير"];

pub(super) const AR_THANKS: &[&str] = &["شكر", "أشكر", "اشكر", "ممتاز", "رائع"];

pub(super) const AR_GOODBYES: &[&str] = &["وداع", "باي", "مع السلامة", "إلى اللقاء", "الى اللقاء"];

pub(super) const AR_AFFIRMATIVES: &[&str] = &["نعم", "حسنا", "حسناً", "تمام", "أكيد", "اكيد", "طيب"];

pub(super) const AR_HOW_ARE_YOU: &[&str] = &["كيف حالك", "كيفك", "كيف الحال"];

pub(super) const GREETING_RESPONSES: &[&str] = &[
    "Hello! 👋 How can I help you today?",
    "Hi there! 😊 What can I do for you?",
    "Hey! Great to see you! How may I assist you today?",
    "Hello! I'm here to help. What do you need?",
    "Hi! 🌟 How can I make your day better?",
];

pub(super) const THANKS_RESPONSES: &[&str] = &[
    "You're very welcome! 😊 Happy to help!",
    "My pleasure! Is there anything else I can assist you with?",
    "Glad I could help! 🌟 Feel free to ask if you need anything else!",
    "You're welcome! That's what I'm here for! 😊",
    "Anytime! Let me know if you need anything else!",
    "I'm happy I could help! Don't hesitate to reach out again! 💙",
];

pub(super) const GOODBYE_RESPONSES: &[&str] = &[
    "Goodbye! Have a wonderful day! 🌟",
    "Take care! Feel free to come back anytime! 😊",
    "See you later! Have a great day! 👋",
    "Bye! Don't hesitate to return if you need help! 💙",
    "Have a fantastic day! See you soon! 🌞",
];

pub(super) const AFFIRMATIVE_RESPONSES: &[&str] = &["Great! How else can I help you? 😊"];

pub(super) const HOW_ARE_YOU_RESPONSES: &[&str] =
    &["I'm doing great, thank you for asking! 😊 How can I help you today?"];
