use rxminder_infra::RxminderContext;
use std::fmt::Debug;
use tracing::error;

#[async_trait::async_trait]
pub trait UseCase: Debug + Send {
    type Response: Send;
    type Errors: Send;

    const NAME: &'static str;

    async fn execute(&mut self, ctx: &RxminderContext) -> Result<Self::Response, Self::Errors>;
}

#[tracing::instrument(name = "Executing usecase", skip(usecase, ctx), fields(usecase = U::NAME))]
pub async fn execute<U>(mut usecase: U, ctx: &RxminderContext) -> Result<U::Response, U::Errors>
where
    U: UseCase,
    U::Errors: Debug,
{
    let res = usecase.execute(ctx).await;

    if let Err(e) = &res {
        error!("Use case error: {:?}", e);
    }

    res
}
