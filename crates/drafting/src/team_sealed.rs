use super::DraftError;
use super::Outcome;
use df_cards::CardId;
use df_core::Seat;

/// One team's shared pool: the member seats and the cards with their
/// current claimant.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct TeamPool {
    pub team: Vec<Seat>,
    pub cards: Vec<(CardId, Option<Seat>)>,
}

/// Not turn-based: the whole pool is pre-dealt to two teams and any
/// member claims any unclaimed card of their team's pool at any time.
/// Claims are optimistic and rejected with `AlreadyTaken` when the owner
/// field is already set. The draft never self-completes; the session
/// owner ends it.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct TeamSealedState {
    pools: Vec<TeamPool>,
}

#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct TeamSealedSync {
    /// The requesting seat's team pool only.
    pub pool: Option<TeamPool>,
}

impl TeamSealedState {
    pub fn new(pools: Vec<(Vec<Seat>, Vec<CardId>)>) -> Self {
        Self {
            pools: pools
                .into_iter()
                .map(|(team, cards)| TeamPool {
                    team,
                    cards: cards.into_iter().map(|c| (c, None)).collect(),
                })
                .collect(),
        }
    }
    pub fn is_complete(&self) -> bool {
        false
    }
    pub fn current_actor(&self) -> Option<Seat> {
        None
    }
    fn pool_of(&mut self, seat: Seat) -> Result<&mut TeamPool, DraftError> {
        self.pools
            .iter_mut()
            .find(|p| p.team.contains(&seat))
            .ok_or_else(|| DraftError::invalid("seat belongs to no team"))
    }
    pub fn claim(&mut self, seat: Seat, card: CardId) -> Result<Outcome, DraftError> {
        let pool = self.pool_of(seat)?;
        let entry = pool
            .cards
            .iter_mut()
            .find(|(c, _)| *c == card)
            .ok_or_else(|| DraftError::invalid("card is not in your team pool"))?;
        if entry.1.is_some() {
            return Err(DraftError::AlreadyTaken);
        }
        entry.1 = Some(seat);
        Ok(Outcome::credit(seat, vec![card]))
    }
    /// Release a card back to the team pool. Only its claimant may.
    pub fn unclaim(&mut self, seat: Seat, card: CardId) -> Result<Outcome, DraftError> {
        let pool = self.pool_of(seat)?;
        let entry = pool
            .cards
            .iter_mut()
            .find(|(c, _)| *c == card)
            .ok_or_else(|| DraftError::invalid("card is not in your team pool"))?;
        if entry.1 != Some(seat) {
            return Err(DraftError::invalid("card is not claimed by you"));
        }
        entry.1 = None;
        Ok(Outcome::default())
    }
    pub fn sync(&self, seat: Seat) -> TeamSealedSync {
        TeamSealedSync {
            pool: self.pools.iter().find(|p| p.team.contains(&seat)).cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> (TeamSealedState, Vec<CardId>, Vec<CardId>) {
        let a: Vec<CardId> = (0..6).map(|_| CardId::default()).collect();
        let b: Vec<CardId> = (0..6).map(|_| CardId::default()).collect();
        let state = TeamSealedState::new(vec![
            (vec![0, 1, 2], a.clone()),
            (vec![3, 4, 5], b.clone()),
        ]);
        (state, a, b)
    }

    #[test]
    fn claim_is_optimistic() {
        let (mut state, a, _) = state();
        state.claim(0, a[0]).unwrap();
        assert_eq!(state.claim(1, a[0]), Err(DraftError::AlreadyTaken));
        // Same-team member takes a different card fine.
        state.claim(1, a[1]).unwrap();
    }
    #[test]
    fn cross_team_claims_rejected() {
        let (mut state, _, b) = state();
        assert!(matches!(
            state.claim(0, b[0]),
            Err(DraftError::InvalidAction { .. })
        ));
    }
    #[test]
    fn unclaim_requires_ownership() {
        let (mut state, a, _) = state();
        state.claim(0, a[0]).unwrap();
        assert!(matches!(
            state.unclaim(1, a[0]),
            Err(DraftError::InvalidAction { .. })
        ));
        state.unclaim(0, a[0]).unwrap();
        state.claim(1, a[0]).unwrap();
    }
    #[test]
    fn never_self_completes() {
        let (mut state, a, _) = state();
        for card in &a {
            state.claim(0, *card).unwrap();
        }
        assert!(!state.is_complete());
    }
}
