// src/generation/exemplars.rs
// Few-shot exemplars used to steer tone and format, one per style and sentiment

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::StyleMode;
use crate::sentiment::SentimentLabel;

/// A short original sentence and the passage it should turn into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exemplar {
    pub original: &'static str,
    pub generated: &'static str,
}

impl Exemplar {
    pub fn render(&self, label: SentimentLabel) -> String {
        format!(
            "- Original ({label}): \"{}\"\n  Generated ({label}): \"{}\"",
            self.original, self.generated
        )
    }
}

const BEACH: &str = "I love sunny days at the beach.";
const TRAFFIC: &str = "Traffic jams ruin my commute.";
const WEATHER: &str = "The weather today is mild.";

const PLAYFUL_POSITIVE: Exemplar = Exemplar {
    original: BEACH,
    generated: "Imagine the sun smiling down on the beach, making everything warm and sparkly like a giant hug from the sky 😄! You can splash in the waves that tickle your toes and build the tallest sandcastles ever. Watch out, or the tide might say, 'Hey, that's my moat!' 😂. Kids everywhere are giggling and chasing seagulls, like it's the world's best playground 🎉! And at the end of the day, as the sun says goodnight with pretty colors, you feel super happy inside, ready for more adventures tomorrow 🚀. Why did the beach ball go to school? To get a little 'shore' education! 🌅",
};

const PLAYFUL_NEGATIVE: Exemplar = Exemplar {
    original: TRAFFIC,
    generated: "Ugh, picture being stuck in a huge line of cars, like a boring game where nobody moves 😞. The engine grumbles like a grumpy monster, and the clock just laughs at you while time drags on forever. Talk about a 'traffic' light that never turns green! 🌧️. Horns beep like angry birds, and you're trapped with nowhere to go, making everything feel extra yucky and slow 💔. It's like the cars are having a never-ending staring contest. Why don't traffic jams ever break up? They're just too 'jammed' together! 😤 At least when you finally get home, you can sigh and say, 'Better luck tomorrow... maybe.'",
};

const PLAYFUL_NEUTRAL: Exemplar = Exemplar {
    original: WEATHER,
    generated: "Today's weather is just right, not too hot or too cold, like wearing your favorite cozy sweater outside 🌤️. Clouds float by like fluffy sheep, and the breeze is gentle, perfect for kicking a ball or reading a book under a tree 📖. It's a normal day where you can do whatever you want without sweating or shivering, keeping things simple and easy 🤔. Why did the cloud go to school? To get a little 'higher' education! ☁️ Either way, it's a chill day with no drama, just steady and nice, like your best buddy who's always there without stealing the show.",
};

const FORMAL_POSITIVE: Exemplar = Exemplar {
    original: BEACH,
    generated: "Sunny days at the beach evoke a profound sense of joy and relaxation. The golden sunlight bathes the shoreline in warmth, creating an ideal setting for leisurely walks along the water's edge. Families gather to enjoy the rhythmic crash of waves, while the gentle sea breeze carries the faint scent of salt and sunscreen. Such moments remind us of nature's ability to recharge the spirit, fostering connections with loved ones and inspiring a deeper appreciation for life's simple pleasures.",
};

const FORMAL_NEGATIVE: Exemplar = Exemplar {
    original: TRAFFIC,
    generated: "Traffic jams transform an ordinary commute into an exasperating ordeal, marked by stagnation and mounting irritation. Vehicles inch forward amid the cacophony of impatient horns, while exhaust fumes thicken the air, amplifying the sense of confinement. Precious time slips away in this involuntary standstill, disrupting schedules and eroding productivity. Ultimately, these delays underscore the vulnerabilities of urban mobility, leaving commuters drained and resentful upon arrival.",
};

const FORMAL_NEUTRAL: Exemplar = Exemplar {
    original: WEATHER,
    generated: "The current weather conditions are mild, characterized by moderate temperatures and low humidity. This equilibrium supports a variety of daily activities, from outdoor errands to indoor pursuits, without the discomfort of extremes. Light cloud cover provides intermittent shade, and a subtle breeze maintains comfort levels. Overall, it presents an unremarkable yet conducive environment for routine proceedings.",
};

static PLAYFUL: Lazy<HashMap<SentimentLabel, Exemplar>> = Lazy::new(|| {
    HashMap::from([
        (SentimentLabel::Positive, PLAYFUL_POSITIVE),
        (SentimentLabel::Negative, PLAYFUL_NEGATIVE),
        (SentimentLabel::Neutral, PLAYFUL_NEUTRAL),
    ])
});

static FORMAL: Lazy<HashMap<SentimentLabel, Exemplar>> = Lazy::new(|| {
    HashMap::from([
        (SentimentLabel::Positive, FORMAL_POSITIVE),
        (SentimentLabel::Negative, FORMAL_NEGATIVE),
        (SentimentLabel::Neutral, FORMAL_NEUTRAL),
    ])
});

/// Read-only exemplar tables keyed by style, then sentiment
pub struct ExampleBank;

impl ExampleBank {
    /// Exemplar for the pair, falling back to the style's neutral entry.
    pub fn exemplar(style: StyleMode, label: SentimentLabel) -> &'static Exemplar {
        let (table, neutral) = match style {
            StyleMode::Playful => (&*PLAYFUL, &PLAYFUL_NEUTRAL),
            StyleMode::Formal => (&*FORMAL, &FORMAL_NEUTRAL),
        };
        table.get(&label).unwrap_or(neutral)
    }

    /// Lookup by a raw label string; unknown labels get the neutral entry.
    pub fn lookup(style: StyleMode, label: &str) -> &'static Exemplar {
        Self::exemplar(style, SentimentLabel::from_model_output(label))
    }

    /// Exemplar rendered for embedding in an instruction
    pub fn render(style: StyleMode, label: SentimentLabel) -> String {
        Self::exemplar(style, label).render(label)
    }
}
