//! Bot advisory client.
//!
//! Scoring calls are coalesced: the first queued request arms a flush
//! window, and everything queued inside it goes upstream as one batch,
//! capped at [`ADVISOR_BATCH_LIMIT`]. Each request resolves independently;
//! a failed batch, or one still unanswered after [`ADVISOR_CALL_TIMEOUT`],
//! resolves to `None` rather than blocking a pick. Answers for a round
//! that has already advanced are discarded.

use std::sync::Arc;
use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::sync::oneshot;
use tokio::time::Instant;

use df_cards::CardId;
use df_cards::Catalog;
use df_core::ADVISOR_BATCH_LIMIT;
use df_core::ADVISOR_CALL_TIMEOUT;
use df_core::ADVISOR_FLUSH_WINDOW;
use df_core::Round;
use df_core::Score;

use crate::RoomError;

/// Score every candidate in the context of what the seat already holds.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct ScoreRequest {
    pub picked: Vec<CardId>,
    pub candidates: Vec<CardId>,
    /// Round stamp at enqueue time; answers landing after the round has
    /// advanced are thrown away.
    pub round: Round,
}

#[async_trait]
pub trait Scorer: Send + Sync {
    /// Scores a batch of requests, one score vector per request, aligned
    /// with each request's candidate order.
    async fn score(&self, batch: &[ScoreRequest]) -> Result<Vec<Vec<Score>>, RoomError>;
}

struct Pending {
    request: ScoreRequest,
    reply: oneshot::Sender<Option<Vec<Score>>>,
}

/// Time-bounded coalescing front over a [`Scorer`].
pub struct Advisor {
    tx: mpsc::Sender<Pending>,
    round: Arc<AtomicU32>,
}

impl Advisor {
    pub fn new(scorer: Arc<dyn Scorer>) -> Self {
        let (tx, rx) = mpsc::channel(256);
        let round = Arc::new(AtomicU32::new(0));
        tokio::spawn(Self::run(scorer, rx, round.clone()));
        Self { tx, round }
    }

    /// Stamps the current round; pending answers for older rounds become
    /// stale.
    pub fn advance_round(&self, round: Round) {
        self.round.store(round, Ordering::SeqCst);
    }

    /// `None` when the scorer failed, the batch was dropped, or the round
    /// advanced before the answer landed. Callers fall back to their own
    /// heuristic in that case.
    pub async fn score(&self, request: ScoreRequest) -> Option<Vec<Score>> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(Pending { request, reply }).await.ok()?;
        rx.await.ok().flatten()
    }

    async fn run(
        scorer: Arc<dyn Scorer>,
        mut rx: mpsc::Receiver<Pending>,
        round: Arc<AtomicU32>,
    ) {
        let window = Duration::from_millis(ADVISOR_FLUSH_WINDOW);
        while let Some(first) = rx.recv().await {
            let mut queue = vec![first];
            let deadline = Instant::now() + window;
            while queue.len() < ADVISOR_BATCH_LIMIT {
                tokio::select! {
                    _ = tokio::time::sleep_until(deadline) => break,
                    next = rx.recv() => match next {
                        Some(pending) => queue.push(pending),
                        None => break,
                    },
                }
            }
            Self::flush(scorer.as_ref(), queue, &round).await;
        }
    }

    async fn flush(scorer: &dyn Scorer, queue: Vec<Pending>, round: &AtomicU32) {
        let batch: Vec<ScoreRequest> = queue.iter().map(|p| p.request.clone()).collect();
        let limit = Duration::from_secs(ADVISOR_CALL_TIMEOUT);
        match tokio::time::timeout(limit, scorer.score(&batch)).await {
            Err(_) => {
                log::warn!("scorer batch still unanswered after {:?}, dropping it", limit);
                for pending in queue {
                    let _ = pending.reply.send(None);
                }
            }
            Ok(Ok(scores)) if scores.len() == queue.len() => {
                let current = round.load(Ordering::SeqCst);
                for (pending, scores) in queue.into_iter().zip(scores) {
                    let fresh = pending.request.round >= current;
                    let _ = pending.reply.send(fresh.then_some(scores));
                }
            }
            Ok(Ok(scores)) => {
                log::warn!(
                    "scorer answered {} score vectors for {} requests, dropping batch",
                    scores.len(),
                    queue.len()
                );
                for pending in queue {
                    let _ = pending.reply.send(None);
                }
            }
            Ok(Err(e)) => {
                log::warn!("scorer batch failed: {}", e);
                for pending in queue {
                    let _ = pending.reply.send(None);
                }
            }
        }
    }
}

/// Built-in fallback scorer: rarity base plus colour affinity with the
/// cards already picked.
pub struct HeuristicScorer {
    catalog: Arc<Catalog>,
}

impl HeuristicScorer {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    fn score_one(&self, picked: &[CardId], candidate: CardId) -> Score {
        use df_cards::Rarity;
        let Some(card) = self.catalog.get(candidate) else {
            return 0.0;
        };
        let base = match card.rarity() {
            Rarity::Common => 1.0,
            Rarity::Uncommon => 2.0,
            Rarity::Rare => 3.0,
            Rarity::Mythic | Rarity::Special => 4.0,
        };
        let affinity: f32 = picked
            .iter()
            .filter_map(|id| self.catalog.get(*id))
            .filter(|held| held.colors().iter().any(|c| card.colors().contains(c)))
            .count() as f32;
        base + affinity * 0.1
    }
}

#[async_trait]
impl Scorer for HeuristicScorer {
    async fn score(&self, batch: &[ScoreRequest]) -> Result<Vec<Vec<Score>>, RoomError> {
        Ok(batch
            .iter()
            .map(|request| {
                request
                    .candidates
                    .iter()
                    .map(|c| self.score_one(&request.picked, *c))
                    .collect()
            })
            .collect())
    }
}

/// Posts batches to an external scoring endpoint.
pub struct HttpScorer {
    client: reqwest::Client,
    url: String,
}

#[derive(serde::Serialize)]
struct ScoreBatch<'a> {
    requests: &'a [ScoreRequest],
}

#[derive(serde::Deserialize)]
struct ScoreAnswer {
    scores: Vec<Vec<Score>>,
}

impl HttpScorer {
    pub fn new(url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(ADVISOR_CALL_TIMEOUT))
            .build()
            .expect("construct http client");
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl Scorer for HttpScorer {
    async fn score(&self, batch: &[ScoreRequest]) -> Result<Vec<Vec<Score>>, RoomError> {
        let answer: ScoreAnswer = self
            .client
            .post(&self.url)
            .json(&ScoreBatch { requests: batch })
            .send()
            .await
            .map_err(|e| RoomError::external(e.to_string()))?
            .error_for_status()
            .map_err(|e| RoomError::external(e.to_string()))?
            .json()
            .await
            .map_err(|e| RoomError::external(e.to_string()))?;
        Ok(answer.scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records the size of every batch it receives.
    struct CountingScorer {
        batches: Mutex<Vec<usize>>,
        fail: bool,
    }

    impl CountingScorer {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                batches: Mutex::new(Vec::new()),
                fail,
            })
        }
    }

    #[async_trait]
    impl Scorer for CountingScorer {
        async fn score(&self, batch: &[ScoreRequest]) -> Result<Vec<Vec<Score>>, RoomError> {
            self.batches.lock().unwrap().push(batch.len());
            if self.fail {
                Err(RoomError::external("down"))
            } else {
                Ok(batch.iter().map(|r| vec![1.0; r.candidates.len()]).collect())
            }
        }
    }

    fn request(round: Round) -> ScoreRequest {
        ScoreRequest {
            picked: vec![],
            candidates: vec![CardId::default(), CardId::default()],
            round,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn requests_inside_the_window_coalesce() {
        let scorer = CountingScorer::new(false);
        let advisor = Advisor::new(scorer.clone());
        let (a, b, c) = tokio::join!(
            advisor.score(request(0)),
            advisor.score(request(0)),
            advisor.score(request(0)),
        );
        assert!(a.is_some() && b.is_some() && c.is_some());
        assert_eq!(*scorer.batches.lock().unwrap(), vec![3]);
    }

    /// Never answers, like a dead upstream endpoint.
    struct HangingScorer;

    #[async_trait]
    impl Scorer for HangingScorer {
        async fn score(&self, _: &[ScoreRequest]) -> Result<Vec<Vec<Score>>, RoomError> {
            std::future::pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn hung_batch_times_out_to_none() {
        let advisor = Advisor::new(Arc::new(HangingScorer));
        let answer = tokio::time::timeout(
            Duration::from_secs(ADVISOR_CALL_TIMEOUT + 1),
            advisor.score(request(0)),
        )
        .await;
        // The caller gets its None at the advisor's own bound; a hung
        // upstream never propagates the hang.
        assert_eq!(answer.expect("advisor answers within its own bound"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_batch_resolves_to_none() {
        let scorer = CountingScorer::new(true);
        let advisor = Advisor::new(scorer);
        assert!(advisor.score(request(0)).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn stale_rounds_are_discarded() {
        let scorer = CountingScorer::new(false);
        let advisor = Advisor::new(scorer);
        advisor.advance_round(5);
        assert!(advisor.score(request(2)).await.is_none());
        assert!(advisor.score(request(5)).await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn batch_ceiling_splits_a_flood() {
        let scorer = CountingScorer::new(false);
        let advisor = Advisor::new(scorer.clone());
        let answers = futures::future::join_all(
            (0..ADVISOR_BATCH_LIMIT + 4).map(|_| advisor.score(request(0))),
        )
        .await;
        assert!(answers.iter().all(|a| a.is_some()));
        let batches = scorer.batches.lock().unwrap();
        assert!(batches.iter().all(|n| *n <= ADVISOR_BATCH_LIMIT));
        assert_eq!(batches.iter().sum::<usize>(), ADVISOR_BATCH_LIMIT + 4);
    }

    #[tokio::test]
    async fn heuristic_prefers_rarity_and_colour_fit() {
        use df_cards::Card;
        use df_cards::ColorSet;
        use df_cards::Rarity;
        use df_core::Unique;
        let red: ColorSet = "R".parse().unwrap();
        let held = Card::new(CardId::default(), "Held", "tst", "1", Rarity::Common, red, "", vec![]);
        let common = Card::new(CardId::default(), "C", "tst", "2", Rarity::Common, red, "", vec![]);
        let rare = Card::new(CardId::default(), "R", "tst", "3", Rarity::Rare, red, "", vec![]);
        let ids = (held.id(), common.id(), rare.id());
        let catalog: Catalog = [held, common, rare].into_iter().collect();
        let scorer = HeuristicScorer::new(Arc::new(catalog));
        let scores = scorer
            .score(&[ScoreRequest {
                picked: vec![ids.0],
                candidates: vec![ids.1, ids.2],
                round: 0,
            }])
            .await
            .unwrap();
        assert!(scores[0][1] > scores[0][0]);
    }
}
