/// One of the five colors.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum Color {
    W,
    U,
    B,
    R,
    G,
}

impl Color {
    pub const ALL: [Color; 5] = [Color::W, Color::U, Color::B, Color::R, Color::G];
}

impl From<Color> for u8 {
    fn from(c: Color) -> u8 {
        match c {
            Color::W => 0,
            Color::U => 1,
            Color::B => 2,
            Color::R => 3,
            Color::G => 4,
        }
    }
}

impl TryFrom<char> for Color {
    type Error = anyhow::Error;
    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            'W' => Ok(Color::W),
            'U' => Ok(Color::U),
            'B' => Ok(Color::B),
            'R' => Ok(Color::R),
            'G' => Ok(Color::G),
            _ => Err(anyhow::anyhow!("unknown color: {}", c)),
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::W => write!(f, "W"),
            Color::U => write!(f, "U"),
            Color::B => write!(f, "B"),
            Color::R => write!(f, "R"),
            Color::G => write!(f, "G"),
        }
    }
}

/// Set of colors encoded in the low five bits of a byte.
///
/// Bit i corresponds to `Color::ALL[i]`, so `"WG"` is `0b10001`.
/// Parses from and displays as a subset of `"WUBRG"`.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ColorSet(u8);

impl ColorSet {
    pub fn contains(&self, color: Color) -> bool {
        self.0 & (1 << u8::from(color)) != 0
    }
    pub fn insert(&mut self, color: Color) {
        self.0 |= 1 << u8::from(color);
    }
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
    /// Exactly one color set.
    pub fn is_mono(&self) -> bool {
        self.len() == 1
    }
    pub fn iter(&self) -> impl Iterator<Item = Color> + '_ {
        Color::ALL.into_iter().filter(|c| self.contains(*c))
    }
}

impl FromIterator<Color> for ColorSet {
    fn from_iter<I: IntoIterator<Item = Color>>(iter: I) -> Self {
        let mut set = ColorSet::default();
        for c in iter {
            set.insert(c);
        }
        set
    }
}

impl From<Color> for ColorSet {
    fn from(c: Color) -> Self {
        std::iter::once(c).collect()
    }
}

impl From<ColorSet> for String {
    fn from(set: ColorSet) -> String {
        set.to_string()
    }
}
impl TryFrom<String> for ColorSet {
    type Error = anyhow::Error;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl std::fmt::Display for ColorSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for c in self.iter() {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for ColorSet {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars().map(Color::try_from).collect()
    }
}
