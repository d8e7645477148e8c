mod average_rating;
mod cover;
mod description;
mod detail;
mod id;
mod price;
mod review_count;
mod title;

pub use self::{
    average_rating::*, cover::*, description::*, detail::*, id::*, price::*, review_count::*,
    title::*,
};
use crate::entity::{BookReview, RowVersion};
use crate::KernelError;
use destructure::Destructure;
use error_stack::Report;
use vodca::References;

#[derive(Debug, Clone, PartialEq, References, Destructure)]
pub struct Book {
    id: BookId,
    title: BookTitle,
    description: BookDescription,
    price: BookPrice,
    cover_image_url: BookCoverImageUrl,
    review_count: ReviewCount,
    average_rating: AverageRating,
    version: RowVersion<Book>,
}

impl Book {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: BookId,
        title: BookTitle,
        description: BookDescription,
        price: BookPrice,
        cover_image_url: BookCoverImageUrl,
        review_count: ReviewCount,
        average_rating: AverageRating,
        version: RowVersion<Book>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            price,
            cover_image_url,
            review_count,
            average_rating,
            version,
        }
    }

    /// Counts one more review and recomputes the average from every review
    /// currently attached to the book. The counter moves even when `reviews`
    /// is empty; the average is left untouched in that case.
    ///
    /// Fails with [`KernelError::Invalid`] and leaves the book unchanged when
    /// the counter cannot grow any further.
    pub fn record_review(
        &mut self,
        reviews: &[BookReview],
    ) -> error_stack::Result<(), KernelError> {
        self.review_count = self.review_count.increment().ok_or_else(|| {
            Report::new(KernelError::Invalid).attach_printable(format!(
                "Review count of book {} is at its maximum",
                self.id.as_ref()
            ))
        })?;
        if let Some(average) = AverageRating::from_ratings(reviews.iter().map(BookReview::rating))
        {
            self.average_rating = average;
        }
        Ok(())
    }

    pub fn with_version(self, version: RowVersion<Book>) -> Self {
        Self { version, ..self }
    }
}
