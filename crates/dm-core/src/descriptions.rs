//! Detail lookup: what each arcana means when a point is selected.

use serde::Serialize;

use crate::arcana::Arcana;

#[derive(Clone, Copy, Debug, Serialize)]
pub struct ArcanaDescription {
    pub number: u8,
    pub name: &'static str,
    pub description: &'static str,
    pub positive: &'static str,
    pub negative: &'static str,
}

const fn entry(
    number: u8,
    name: &'static str,
    description: &'static str,
    positive: &'static str,
    negative: &'static str,
) -> ArcanaDescription {
    ArcanaDescription {
        number,
        name,
        description,
        positive,
        negative,
    }
}

// Indexed by arcana - 1.
static DESCRIPTIONS: [ArcanaDescription; 22] = [
    entry(
        1,
        "The Magician",
        "Energy of beginnings, initiative and the power of the word. A person who turns ideas into action.",
        "Quick mind, eloquence, many talents, ability to start things and inspire others.",
        "Manipulation, scattered efforts, abandoning projects halfway, arrogance.",
    ),
    entry(
        2,
        "The High Priestess",
        "Energy of intuition, hidden knowledge and inner wisdom.",
        "Deep intuition, calm, discretion, a talent for listening and teaching.",
        "Passivity, secrecy, gossip, living in illusions instead of acting.",
    ),
    entry(
        3,
        "The Empress",
        "Energy of femininity, abundance, beauty and creation.",
        "Care, creativity, a gift for comfort and for making things grow.",
        "Possessiveness, overspending, dependence on appearance and approval.",
    ),
    entry(
        4,
        "The Emperor",
        "Energy of structure, authority and responsibility.",
        "Leadership, reliability, strategic thinking, protection of others.",
        "Control, rigidity, domineering behaviour, fear of losing power.",
    ),
    entry(
        5,
        "The Hierophant",
        "Energy of teaching, tradition and moral principles.",
        "Mentorship, wisdom, respect for family and heritage, a sense of justice.",
        "Moralising, dogmatism, hypocrisy, imposing one's views on others.",
    ),
    entry(
        6,
        "The Lovers",
        "Energy of love, choice and harmony in relationships.",
        "Warmth, attractiveness, aesthetic taste, sincere partnerships.",
        "Indecision, dependence on a partner, jealousy, choosing with the head against the heart.",
    ),
    entry(
        7,
        "The Chariot",
        "Energy of movement, victory and purposeful drive.",
        "Determination, courage, love of travel, ability to reach goals.",
        "Aggression, restlessness, pushing through at any cost, burnout.",
    ),
    entry(
        8,
        "Justice",
        "Energy of balance, law and cause and effect.",
        "Fairness, honesty, clear judgement, orderliness.",
        "Judging others, pettiness, resentment, inability to forgive.",
    ),
    entry(
        9,
        "The Hermit",
        "Energy of solitude, wisdom and inner search.",
        "Depth, self-sufficiency, a talent for research and guidance.",
        "Isolation, coldness, melancholy, closing off from people.",
    ),
    entry(
        10,
        "Wheel of Fortune",
        "Energy of luck, cycles and the flow of life.",
        "Optimism, luck, easy adaptation to change, trust in the process.",
        "Fatalism, waiting for luck instead of acting, gambling, instability.",
    ),
    entry(
        11,
        "Strength",
        "Energy of physical and inner power, endurance and self-mastery.",
        "Stamina, hard work, courage, ability to tame difficult situations.",
        "Overwork, anger, stubbornness, forcing solutions.",
    ),
    entry(
        12,
        "The Hanged Man",
        "Energy of service, sacrifice and seeing the world differently.",
        "Compassion, creativity, unconventional vision, devotion to a cause.",
        "Victimhood, stagnation, self-sacrifice that no one asked for.",
    ),
    entry(
        13,
        "Death",
        "Energy of transformation, endings and renewal.",
        "Ability to let go, radical change, rebirth after crises.",
        "Fear of change, destructiveness, clinging to what is already over.",
    ),
    entry(
        14,
        "Temperance",
        "Energy of balance, moderation and healing.",
        "Patience, calm, a sense of proportion, a gift for harmonising people.",
        "Apathy, excessive caution, suppressed emotions, lack of boundaries.",
    ),
    entry(
        15,
        "The Devil",
        "Energy of temptation, charisma and material power.",
        "Magnetism, business acumen, ability to influence and earn.",
        "Addictions, manipulation, greed, living by others' rules of power.",
    ),
    entry(
        16,
        "The Tower",
        "Energy of sudden change, breaking old forms and building anew.",
        "Builder's talent, resilience, ability to start over after collapse.",
        "Pride, destructiveness, conflicts, refusing to see reality.",
    ),
    entry(
        17,
        "The Star",
        "Energy of hope, talent and recognition.",
        "Creativity, inspiration, openness, ability to shine for others.",
        "Vanity, star fever, dreaming without acting, fear of being seen.",
    ),
    entry(
        18,
        "The Moon",
        "Energy of the subconscious, imagination and mystery.",
        "Rich imagination, intuition, artistic gifts, sensitivity.",
        "Fears, anxiety, self-deception, escaping into illusions.",
    ),
    entry(
        19,
        "The Sun",
        "Energy of joy, success and vitality.",
        "Warmth, generosity, optimism, natural leadership.",
        "Egocentrism, arrogance, the need to be the centre of attention.",
    ),
    entry(
        20,
        "Judgement",
        "Energy of family, ancestry and awakening.",
        "Strong family ties, wisdom of the lineage, a sense of calling.",
        "Family conflicts, harsh judgement, ignoring one's roots.",
    ),
    entry(
        21,
        "The World",
        "Energy of wholeness, completion and broad horizons.",
        "Diplomacy, openness to new cultures, the ability to finish what was started.",
        "Restlessness, inability to find one's place, fear of the new.",
    ),
    entry(
        22,
        "The Fool",
        "Energy of freedom, spontaneity and a fresh start.",
        "Lightness, openness, sense of humour, fearless curiosity.",
        "Irresponsibility, infantilism, chaotic life, avoiding commitments.",
    ),
];

/// Detail record for an arcana.
pub fn describe(arcana: Arcana) -> &'static ArcanaDescription {
    &DESCRIPTIONS[arcana.get() as usize - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_arcana_has_matching_record() {
        for a in Arcana::all() {
            let d = describe(a);
            assert_eq!(d.number, a.get());
            assert!(!d.description.is_empty());
            assert!(!d.positive.is_empty());
            assert!(!d.negative.is_empty());
        }
    }

    #[test]
    fn test_extremes() {
        assert_eq!(describe(Arcana::MIN).name, "The Magician");
        assert_eq!(describe(Arcana::MAX).name, "The Fool");
    }
}
