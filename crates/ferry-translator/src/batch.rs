use ferry_types::{LanguagePair, Translation, TranslationError, TranslationInput, Validatable};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::service::TranslationService;

type UnitResult = (usize, Result<Translation, TranslationError>);

impl TranslationService {
    /// Translates every input concurrently, returning results in input order.
    ///
    /// At most `min(service.max_concurrency, inputs.len())` translations run at a
    /// time. The first failure cancels the rest and is returned on its own.
    pub async fn translate_batch(
        &self,
        inputs: Vec<TranslationInput>,
        language_pair: LanguagePair,
    ) -> Result<Vec<Translation>, TranslationError> {
        if !inputs.is_well_formed() || !language_pair.is_well_formed() {
            return Err(TranslationError::InvalidArguments);
        }

        let limit = self
            .context()
            .config
            .service
            .max_concurrency
            .clamp(1, inputs.len());
        tracing::debug!(count = inputs.len(), limit, "Starting batch");

        let cancel = CancellationToken::new();
        let mut slots: Vec<Option<Translation>> = vec![None; inputs.len()];
        let mut pending = inputs.into_iter().enumerate();
        let mut tasks: JoinSet<UnitResult> = JoinSet::new();
        let mut failure: Option<TranslationError> = None;

        for (index, input) in pending.by_ref().take(limit) {
            self.spawn_unit(&mut tasks, index, input, &language_pair, &cancel);
        }

        // In-flight units are drained rather than aborted so every session tears down
        while let Some(joined) = tasks.join_next().await {
            let outcome = match joined {
                Ok((index, result)) => result.map(|translation| (index, translation)),
                Err(e) => Err(TranslationError::unknown(e.to_string())),
            };

            match outcome {
                Ok((index, translation)) => slots[index] = Some(translation),
                Err(e) if failure.is_none() => {
                    tracing::debug!("Batch unit failed, cancelling the rest: {e}");
                    failure = Some(e);
                    cancel.cancel();
                }
                Err(_) => {}
            }

            if failure.is_none() {
                if let Some((index, input)) = pending.next() {
                    self.spawn_unit(&mut tasks, index, input, &language_pair, &cancel);
                }
            }
        }

        if let Some(e) = failure {
            return Err(e);
        }

        slots
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| TranslationError::unknown("Batch finished with missing results."))
    }

    fn spawn_unit(
        &self,
        tasks: &mut JoinSet<UnitResult>,
        index: usize,
        input: TranslationInput,
        language_pair: &LanguagePair,
        cancel: &CancellationToken,
    ) {
        let service = self.clone();
        let language_pair = language_pair.clone();
        let cancel = cancel.clone();

        tasks.spawn(async move {
            let result = service
                .translate_cancellable(input, language_pair, None, &cancel)
                .await;
            (index, result)
        });
    }
}
