use std::future::IntoFuture;
use std::marker::PhantomData;

// Original: https://github.com/HalsekiRaika/architectured/blob/e5caa5c7ae801d1aaac6e275b3ea0ef26d6ff26b/server/src/controller.rs
/// Turns a request into the dto a service takes.
pub trait Intake<I>: 'static + Sync + Send {
    type To;
    fn emit(&self, input: I) -> Self::To;
}

/// Turns a service result into a response.
pub trait Exhaust<I>: 'static + Sync + Send {
    type To;
    fn emit(&self, input: I) -> Self::To;
}

pub struct Controller<T, P, I, D, O> {
    transformer: T,
    presenter: P,
    _input: PhantomData<I>,
    _dto: PhantomData<D>,
    _output: PhantomData<O>,
}

impl<T, P, I, D, O> Controller<T, P, I, D, O> {
    pub fn new(transformer: T, presenter: P) -> Self {
        Self {
            transformer,
            presenter,
            _input: PhantomData,
            _dto: PhantomData,
            _output: PhantomData,
        }
    }

    fn preset(self) -> P {
        self.presenter
    }
}

impl<T, P, I, D, O> Controller<T, P, I, D, O>
where
    T: Intake<I, To = D>,
{
    pub fn intake(self, input: I) -> Transformed<T, P, I, D, O> {
        Transformed {
            transformed: self.transformer.emit(input),
            controller: self,
        }
    }
}

impl<P, O> Controller<(), P, (), (), O>
where
    P: Exhaust<O>,
{
    /// For calls that take no input.
    pub async fn bypass<F, Fut, E>(self, f: F) -> Result<P::To, E>
    where
        F: FnOnce() -> Fut,
        Fut: IntoFuture<Output = Result<O, E>>,
    {
        Ok(self.preset().emit(f().await?))
    }
}

pub struct Transformed<T, P, I, D, O> {
    transformed: D,
    controller: Controller<T, P, I, D, O>,
}

impl<T, P, I, D, O> Transformed<T, P, I, D, O>
where
    T: Intake<I, To = D>,
    P: Exhaust<O>,
{
    pub async fn handle<F, Fut, E>(self, f: F) -> Result<P::To, E>
    where
        F: FnOnce(D) -> Fut,
        Fut: IntoFuture<Output = Result<O, E>>,
    {
        Ok(self.controller.preset().emit(f(self.transformed).await?))
    }
}
